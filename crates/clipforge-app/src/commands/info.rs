//! Show timeline information.

use std::path::PathBuf;

use clipforge_timeline::TimelineFile;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let file = TimelineFile::load_from_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load timeline: {e}"))?;
    let timeline = &file.timeline;

    println!("Timeline: {}", path.display());
    println!("  Schema version: {}", file.schema);
    println!("  Written by: {}", file.written_by);
    println!(
        "  Canvas: {}x{} @ {}fps",
        timeline.width, timeline.height, timeline.fps
    );
    println!("  Duration: {:.2}s", timeline.duration);
    println!();

    println!("Tracks:");
    for (index, track) in timeline.tracks.iter().enumerate() {
        let mut flags = Vec::new();
        if track.locked {
            flags.push("locked");
        }
        if !track.visible {
            flags.push("hidden");
        }
        println!(
            "  {index}: {} ({:?}, {} clips){}",
            track.name,
            track.kind,
            track.clip_count(),
            if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            }
        );
        for clip in &track.clips {
            println!(
                "      {:?} {:.2}s..{:.2}s {}",
                clip.kind(),
                clip.start_time,
                clip.end_time(),
                clip.source().unwrap_or("")
            );
        }
    }

    Ok(())
}
