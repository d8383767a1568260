use indexmap::IndexMap;
use narwhal::{BBox, BBoxResolver, BoxResolver, CachedResolver, ResolverConfig};
use narwhal_svg::{SvgDocument, fit_svg};
use serde::Serialize;
use std::io::{Read, Write};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Config(narwhal::Error),
    Svg(narwhal_svg::Error),
    Json(serde_json::Error),
    EmptyInput,
    NoOutput(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Svg(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::EmptyInput => write!(f, "narwhal: empty input"),
            CliError::NoOutput(what) => write!(f, "narwhal: no output produced ({what})"),
        }
    }
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::EmptyInput => 2,
            CliError::NoOutput(_) | CliError::Svg(narwhal_svg::Error::MissingSvgRoot) => 3,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        Self::Config(value)
    }
}

impl From<narwhal_svg::Error> for CliError {
    fn from(value: narwhal_svg::Error) -> Self {
        Self::Svg(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Boxes,
    Fit,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    all: bool,
    padding: f64,
    verbosity: u8,
    help: bool,
    version: bool,
}

fn usage() -> &'static str {
    "narwhal\n\
\n\
USAGE:\n\
  narwhal [boxes] [--pretty] [--all] [--config <path>] [-v|-vv] [<path>|-]\n\
  narwhal fit [--padding <n>] [--config <path>] [-v|-vv] [<path>|-]\n\
  narwhal --version\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the SVG document is read from stdin.\n\
  - boxes prints a JSON object of element id -> {x,y,width,height} in parent space;\n\
    --all keys every element by its `tag[index]` path instead.\n\
  - fit rewrites the root viewBox/max-width around the content (default padding: 8).\n\
  - --config points at a JSON resolver config, e.g. {\"charWidth\": 8, \"lineHeight\": 16}.\n\
  - Logging goes to stderr; NARWHAL_LOG overrides -v (e.g. NARWHAL_LOG=narwhal=trace).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        padding: 8.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => args.help = true,
            "--version" | "-V" => args.version = true,
            "boxes" => args.command = Command::Boxes,
            "fit" => args.command = Command::Fit,
            "--pretty" => args.pretty = true,
            "--all" => args.all = true,
            "-v" => args.verbosity = args.verbosity.max(1),
            "-vv" => args.verbosity = 2,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--padding" => {
                let Some(p) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.padding = p.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !args.padding.is_finite() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("NARWHAL_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    let text = match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
    };
    if text.trim().is_empty() {
        return Err(CliError::EmptyInput);
    }
    Ok(text)
}

fn load_config(path: Option<&str>) -> Result<ResolverConfig, CliError> {
    match path {
        None => Ok(ResolverConfig::default()),
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(ResolverConfig::from_json_str(&json)?)
        }
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn collect_boxes(
    doc: &SvgDocument<'_>,
    resolver: &CachedResolver,
    all: bool,
) -> Result<IndexMap<String, BBox>, CliError> {
    let mut out: IndexMap<String, BBox> = IndexMap::new();
    for el in doc.elements()? {
        let key = if all {
            el.path()
        } else {
            match el.id() {
                Some(id) => id.to_string(),
                None => continue,
            }
        };
        if out.contains_key(&key) {
            tracing::warn!(key = %key, "duplicate element id; keeping the first occurrence");
            continue;
        }
        out.insert(key, resolver.resolve(&el));
    }
    Ok(out)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let config = load_config(args.config.as_deref())?;
    let resolver = BBoxResolver::new(config);

    match args.command {
        Command::Boxes => {
            let doc = SvgDocument::parse(&text)?;
            let cached = CachedResolver::new(resolver);
            let boxes = collect_boxes(&doc, &cached, args.all)?;
            if boxes.is_empty() {
                return Err(CliError::NoOutput("no element with an id"));
            }
            tracing::debug!(count = boxes.len(), "resolved element boxes");
            write_json(&boxes, args.pretty)
        }
        Command::Fit => {
            let (svg, viewport) = fit_svg(&text, &CachedResolver::new(resolver), args.padding)?;
            tracing::debug!(view_box = %viewport.view_box_attr(), "rewrote root viewport");
            print!("{svg}");
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    if args.help {
        print!("{}", usage());
        return;
    }
    if args.version {
        println!("narwhal {}", narwhal::VERSION);
        return;
    }
    init_logging(args.verbosity);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        std::iter::once("narwhal")
            .chain(parts.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn defaults_to_boxes_from_stdin() {
        let args = parse_args(&argv(&[])).expect("args");
        assert!(matches!(args.command, Command::Boxes));
        assert_eq!(args.input, None);
        assert_eq!(args.padding, 8.0);
    }

    #[test]
    fn parses_fit_with_padding_and_path() {
        let args = parse_args(&argv(&["fit", "--padding", "40", "in.svg"])).expect("args");
        assert!(matches!(args.command, Command::Fit));
        assert_eq!(args.padding, 40.0);
        assert_eq!(args.input.as_deref(), Some("in.svg"));
    }

    #[test]
    fn rejects_unknown_flags_and_extra_paths() {
        assert!(parse_args(&argv(&["--nope"])).is_err());
        assert!(parse_args(&argv(&["a.svg", "b.svg"])).is_err());
        assert!(parse_args(&argv(&["--padding", "NaN"])).is_err());
    }

    #[test]
    fn exit_codes_follow_the_stream_contract() {
        assert_eq!(CliError::EmptyInput.exit_code(), 2);
        assert_eq!(CliError::NoOutput("x").exit_code(), 3);
        assert_eq!(
            CliError::Svg(narwhal_svg::Error::MissingSvgRoot).exit_code(),
            3
        );
        assert_eq!(CliError::Usage("u").exit_code(), 1);
    }
}
