use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};

pub(crate) const USAGE: &str = "\
Usage: chorder <ROOT> [QUALITY] [options]
       chorder --list

Find fingerings of a chord, e.g. `chorder C m7 --instrument guitar`.

Options:
  --instrument NAME     instrument profile (default from config, else ukulele)
  --span N              maximum hand span in frets
  --max-root-fret N     highest fret the root may sit on
  --root-strings I,J    strings (0 = first) allowed to carry the root
  --select N            fingering to play or export (1-based, default 1)
  --play                play the selected fingering
  --duration SECS       playback / export length
  --wav PATH            write the selected fingering to a WAV file
  --json                print results as JSON
  --config PATH         config file (default: <config dir>/chorder/config.toml)
  --list                list note names, chord qualities and instruments
  -h, --help            show this help";

#[derive(Debug, Default, PartialEq)]
pub(crate) struct CliArgs {
    pub root: Option<String>,
    pub quality: Option<String>,
    pub instrument: Option<String>,
    pub max_span: Option<u8>,
    pub max_root_fret: Option<u8>,
    pub root_strings: Option<Vec<usize>>,
    pub select: Option<usize>,
    pub play: bool,
    pub duration_secs: Option<f64>,
    pub wav: Option<PathBuf>,
    pub json: bool,
    pub config: Option<PathBuf>,
    pub list: bool,
    pub help: bool,
}

impl CliArgs {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        let mut positional = Vec::new();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| args.next().with_context(|| format!("{flag} needs a value"));
            match arg.as_str() {
                "--instrument" => parsed.instrument = Some(value("--instrument")?),
                "--span" => parsed.max_span = Some(parse_number("--span", &value("--span")?)?),
                "--max-root-fret" => {
                    parsed.max_root_fret = Some(parse_number("--max-root-fret", &value("--max-root-fret")?)?)
                }
                "--root-strings" => {
                    let list = value("--root-strings")?;
                    let strings = list
                        .split(',')
                        .map(|s| parse_number("--root-strings", s.trim()))
                        .collect::<anyhow::Result<Vec<usize>>>()?;
                    parsed.root_strings = Some(strings);
                }
                "--select" => {
                    let index: usize = parse_number("--select", &value("--select")?)?;
                    if index == 0 {
                        bail!("--select counts from 1");
                    }
                    parsed.select = Some(index);
                }
                "--play" => parsed.play = true,
                "--duration" => parsed.duration_secs = Some(parse_number("--duration", &value("--duration")?)?),
                "--wav" => parsed.wav = Some(PathBuf::from(value("--wav")?)),
                "--json" => parsed.json = true,
                "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
                "--list" => parsed.list = true,
                "-h" | "--help" => parsed.help = true,
                flag if flag.starts_with("--") => bail!("unknown option {flag}"),
                other => positional.push(other.to_string()),
            }
        }

        let mut positional = positional.into_iter();
        parsed.root = positional.next();
        parsed.quality = positional.next();
        if let Some(extra) = positional.next() {
            bail!("unexpected argument {extra:?}");
        }
        if parsed.root.is_none() && !parsed.list && !parsed.help {
            bail!("missing chord root\n\n{USAGE}");
        }
        Ok(parsed)
    }

    /// Whether a fingering needs to be picked for audio output
    pub fn wants_audio(&self) -> bool {
        self.play || self.wav.is_some()
    }
}

fn parse_number<T: FromStr>(flag: &str, text: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse::<T>()
        .with_context(|| format!("invalid value {text:?} for {flag}"))
}
