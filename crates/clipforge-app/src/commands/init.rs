//! Write a demo timeline.

use std::path::PathBuf;

use clipforge_timeline::{
    Clip, TextAnimation, Timeline, TimelineFile, TimelineStore, TrackKind,
};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    let mut store = TimelineStore::new(Timeline::new(1080, 1920, 30.0));
    let overlay = store.add_track(TrackKind::Overlay, Some("Captions".to_string()))?;
    let video = store.add_track(TrackKind::Video, None)?;
    let audio = store.add_track(TrackKind::Audio, None)?;

    store.add_clip(Clip::video("media/intro.mp4", 0.0, 5.0), Some(video))?;
    store.add_clip(Clip::video("media/main.mp4", 5.0, 7.0), Some(video))?;
    store.add_clip(Clip::audio("media/music.mp3", 0.0, 12.0), Some(audio))?;

    let mut title = Clip::text("Made with ClipForge", 0.5, 3.0);
    if let Some(props) = title.properties.text_mut() {
        props.x = 540.0;
        props.y = 400.0;
        props.size = 64.0;
        props.bold = true;
        props.animation = TextAnimation::FadeIn;
        props.background = Some("#00000080".to_string());
    }
    store.add_clip(title, Some(overlay))?;

    let mut outro = Clip::text("Thanks for watching", 9.0, 3.0);
    if let Some(props) = outro.properties.text_mut() {
        props.x = 540.0;
        props.y = 1500.0;
        props.animation = TextAnimation::SlideUp;
    }
    store.add_clip(outro, Some(overlay))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    TimelineFile::new(store.timeline().clone()).save_to_file(&path)?;

    println!("Wrote demo timeline to {}", path.display());
    println!("  Duration: {:.2}s", store.duration());
    println!("  Tracks: {}", store.timeline().tracks.len());
    Ok(())
}
