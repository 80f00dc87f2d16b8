use std::io::Read;
use svgflat::{ParseOptions, PipelineOptions, Svg};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Pipeline(svgflat::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Pipeline(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<svgflat::Error> for CliError {
    fn from(value: svgflat::Error) -> Self {
        Self::Pipeline(value)
    }
}

#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    output: Option<String>,
    max_depth: Option<usize>,
}

fn usage() -> &'static str {
    "svgflat\n\
\n\
USAGE:\n\
  svgflat [-i <path>|-] [-o <path>] [--max-depth <n>]\n\
\n\
OPTIONS:\n\
  -i, --input <path>    SVG file to flatten; '-' or omitted reads stdin\n\
  -o, --output <path>   write the result to a file instead of stdout\n\
      --max-depth <n>   maximum element nesting depth (default 64)\n\
\n\
NOTES:\n\
  - The input may also be given as a bare positional argument.\n\
  - Malformed markup is tolerated: the output is an <invalid/> placeholder\n\
    carrying the parse error, and the exit status is still 0.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--input" | "-i" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.clone());
            }
            "--output" | "-o" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.output = Some(path.clone());
            }
            "--max-depth" => {
                let Some(depth) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.max_depth =
                    Some(depth.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
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

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_output(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            println!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let source = read_input(args.input.as_deref())?;

    let mut pipeline = PipelineOptions::default();
    if let Some(max_depth) = args.max_depth {
        pipeline.max_depth = max_depth;
    }

    let mut svg =
        Svg::parse(&source, ParseOptions::lenient())?.with_pipeline_options(pipeline);
    svg.pathify()?;
    svg.resolve_transforms()?;
    svg.flatten()?;

    write_output(&svg.to_svg_string(), args.output.as_deref())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
