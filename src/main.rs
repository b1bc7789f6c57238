use drumbox::{
    Conductor, InstrumentRegistry, LogTrigger, Tempo, Track, create_notification_channel,
};
use ringbuf::traits::Consumer;
use std::sync::{Arc, Mutex};
use std::thread;

// Sized for the worst case of every instrument failing on every step of a
// few bars before the consumer drains
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 256;

fn main() {
    env_logger::init();

    println!("=== Drumbox ===");
    println!("Step-sequencer playback engine demo\n");

    // Fixed instrument set, built once and handed to the conductor
    let mut registry = InstrumentRegistry::new();
    for name in ["kick", "snare", "hat", "clap"] {
        registry.register(name, Box::new(LogTrigger::new(name)));
    }
    let registry = Arc::new(registry);

    let (notification_tx, mut notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);
    let notification_tx = Arc::new(Mutex::new(notification_tx));

    let mut conductor = Conductor::new(registry, Tempo::default(), notification_tx);

    // Program the demo beat
    let track = Arc::new(Track::new());
    if let Err(e) = program_demo_beat(&track) {
        eprintln!("ERROR: {}", e);
        return;
    }

    if let Err(e) = conductor.set_track(track) {
        eprintln!("ERROR: {}", e);
        return;
    }

    println!("Playing two bars at {}...", conductor.tempo());
    if let Err(e) = conductor.start() {
        eprintln!("ERROR: {}", e);
        return;
    }

    // Two full pattern cycles
    thread::sleep(conductor.tempo().tick_interval() * 32);
    conductor.stop();

    while let Some(notification) = notification_rx.try_pop() {
        eprintln!("{}", notification);
    }

    println!("Stopped at step {}. Bye!", conductor.progress());
}

fn program_demo_beat(track: &Track) -> Result<(), drumbox::TrackError> {
    track.set_track_name("Demo Beat")?;
    track.set_artist_name("Drumbox")?;

    track.add_instrument("kick", None)?;
    track.add_instrument("snare", None)?;
    track.add_instrument("hat", None)?;

    for step in [0, 4, 8, 12] {
        track.toggle_step("kick", step)?;
    }
    for step in [4, 12] {
        track.toggle_step("snare", step)?;
    }
    for step in (0..drumbox::TRACK_LENGTH).step_by(2) {
        track.toggle_step("hat", step)?;
    }

    Ok(())
}
