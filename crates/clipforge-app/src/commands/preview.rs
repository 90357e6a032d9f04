//! Headless playback and frame snapshot.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clipforge_core::{EngineConfig, FrameBuffer};
use clipforge_engine::{Engine, ManualTimeSource};
use clipforge_media::SimulatedBackend;
use clipforge_timeline::TimelineFile;
use tracing::info;

pub fn run(
    config: EngineConfig,
    path: PathBuf,
    at: f64,
    play: f64,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let file = TimelineFile::load_from_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load timeline: {e}"))?;
    let timeline = file.timeline;
    let (width, height) = (timeline.width, timeline.height);
    let step = if timeline.fps > 0.0 { 1.0 / timeline.fps } else { 1.0 / 30.0 };

    let time = ManualTimeSource::new();
    let mut engine = Engine::new(config, timeline, SimulatedBackend::new(), time.clone());
    engine.seek(at);

    if play > 0.0 {
        engine.play();
        let mut elapsed = 0.0;
        while elapsed < play && engine.is_playing() {
            let dt = step.min(play - elapsed);
            time.advance(dt);
            elapsed += dt;
            engine.tick();
        }
        info!(elapsed, time = engine.current_time(), "simulated playback finished");
    }

    let mut frame = FrameBuffer::new(width, height);
    let report = engine.frame(&mut frame);

    println!("Frame at {:.3}s ({})", report.time, if report.playing { "playing" } else { "paused" });
    println!(
        "  Media handles: {} attached, {} reseeked, {} errored",
        engine.media().attached_count(),
        report.sync.reseeked,
        report.sync.errored
    );
    println!(
        "  Overlays: {} text, {} image",
        report.render.text, report.render.images
    );

    if let Some(out) = out {
        let writer = BufWriter::new(File::create(&out)?);
        frame.write_ppm(writer)?;
        println!("  Wrote {}", out.display());
    }

    engine.dispose();
    Ok(())
}
