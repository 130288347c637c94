use tectosphere::WorldStats;
use tectosphere::plates::BoundaryKind;

/// Plain-text summary of a world, one fact per line.
pub fn format_report(stats: &WorldStats) -> String {
    let mut lines = vec![
        format!("seed:        {}", stats.seed),
        format!(
            "mesh:        {} vertices, {} triangles, {} edges",
            stats.vertices, stats.triangles, stats.edges
        ),
        format!("degrees:     {}..={}", stats.min_degree, stats.max_degree),
        format!(
            "plates:      {} ({} of {} vertices claimed, sizes {}..={})",
            stats.plates, stats.claimed, stats.vertices, stats.smallest_plate, stats.largest_plate
        ),
        format!(
            "boundaries:  {} border edges, {} corners, {} triple junctions",
            stats.borders, stats.corners, stats.triple_junctions
        ),
    ];
    lines.extend(BoundaryKind::ALL.iter().map(|kind| {
        let count = stats.kinds.get(kind).copied().unwrap_or(0);
        format!("  {:<13}{count}", kind.name())
    }));
    lines.push(format!(
        "elevation:   {:.3} to {:.3}",
        stats.elevation_min, stats.elevation_max
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
