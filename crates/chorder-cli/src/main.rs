//! chorder: find and audition chord fingerings for fretted instruments

mod args;
mod config;
mod render;

use anyhow::Context;
use chorder_core::{
    ChordQuality, NoteName, SearchOptions, WaveformSynthesizer, chord_name, search,
};
use chorder_services::{AudioOutputService, ChordPlayer, write_wav_file};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{CliArgs, USAGE};
use config::{AppConfig, load_config};
use render::{FingeringReport, summary_line, text_diagram};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so results on stdout stay clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("chorder=info".parse()?))
        .init();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    if args.list {
        print_list(&config);
        return Ok(());
    }

    let root: NoteName = args.root.as_deref().unwrap_or_default().parse()?;
    let quality: ChordQuality = args.quality.as_deref().unwrap_or_default().parse()?;
    let instrument_name = args.instrument.as_deref().unwrap_or(&config.defaults.instrument);
    let instrument = config.resolve_instrument(instrument_name)?;

    let options = SearchOptions {
        root_strings: args.root_strings.clone(),
        max_root_fret: args.max_root_fret.or(config.defaults.max_root_fret),
        max_span: args.max_span.unwrap_or(config.defaults.max_span),
    };

    let chord = chord_name(root, quality);
    tracing::info!(chord = %chord, instrument = instrument.name(), "Searching fingerings");

    let fingerings = search(root.pitch_class(), quality, &instrument, &options)?;
    if fingerings.is_empty() {
        println!("No fingering found for {chord} on {}", instrument.name());
        return Ok(());
    }

    let reports = fingerings
        .iter()
        .enumerate()
        .map(|(i, assignment)| FingeringReport::new(i + 1, assignment, &instrument, root.pitch_class()))
        .collect::<chorder_core::Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("{chord} on {}: {} fingerings\n", instrument.name(), reports.len());
        for report in &reports {
            println!("{}", summary_line(report));
            println!("{}", text_diagram(report, &instrument));
        }
    }

    if !args.wants_audio() {
        return Ok(());
    }

    let selected = args.select.unwrap_or(1);
    let assignment = fingerings
        .get(selected - 1)
        .with_context(|| format!("--select {selected}: only {} fingerings", fingerings.len()))?;
    let duration_secs = args.duration_secs.unwrap_or(config.defaults.duration_secs);
    let synth = WaveformSynthesizer::new(config.defaults.sample_rate, config.defaults.reference_frequency);

    if let Some(path) = &args.wav {
        let waveform = synth.render(assignment, &instrument, duration_secs)?;
        write_wav_file(&waveform, path).with_context(|| format!("writing {}", path.display()))?;
        eprintln!("Wrote {chord} {assignment} to {}", path.display());
    }

    if args.play {
        ChordPlayer::new(synth).play(assignment, &instrument, duration_secs)?;
    }

    Ok(())
}

fn print_list(config: &AppConfig) {
    println!("Notes:");
    for note in NoteName::ALL {
        println!("  {}", note.name());
    }
    println!("\nQualities:");
    for quality in ChordQuality::ALL {
        let symbol = if quality.symbol().is_empty() { "(none)" } else { quality.symbol() };
        println!("  {:<8} {}", symbol, quality.name());
    }
    println!("\nInstruments:");
    for name in config.instrument_names() {
        println!("  {name}");
    }
    match AudioOutputService::get_default_device_info() {
        Ok((name, sample_rate, channels)) => {
            println!("\nOutput device: {name} ({sample_rate} Hz, {channels} channels)")
        }
        Err(e) => println!("\nOutput device: unavailable ({e})"),
    }
}
