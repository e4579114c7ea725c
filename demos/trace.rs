//! Very simple tool that accepts SVG path data as an input and prints traced sections as JSON
#![deny(warnings)]

use std::{env, fs::File, io::Read};
use svgtrace::*;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    input_file: String,
    tr: Transform,
    style: Style,
    options: TraceOptions,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut result = Args {
            input_file: String::new(),
            tr: Transform::identity(),
            style: Style::default(),
            options: TraceOptions::default(),
        };
        let mut positional = 0;
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "trace".to_owned());
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => {
                    positional = 0;
                    break;
                }
                "-r" => {
                    let resolution = args.next().ok_or("-r requires argument")?;
                    result.options.resolution = resolution.parse()?;
                }
                "-t" => {
                    result.tr = args.next().ok_or("-t requires argument")?.parse()?;
                }
                "-fill" => {
                    let fill = args.next().ok_or("-fill requires argument")?;
                    result.style.fill = RGBA::parse_paint(&fill)?;
                }
                "-stroke" => {
                    let stroke = args.next().ok_or("-stroke requires argument")?;
                    result.style.stroke = RGBA::parse_paint(&stroke)?;
                }
                "-w" => {
                    let width = args.next().ok_or("-w requires argument")?;
                    result.style.stroke_width = width.parse()?;
                }
                "-n" => {
                    result.options.subpaths = false;
                }
                _ => {
                    positional += 1;
                    match positional {
                        1 => result.input_file = arg,
                        _ => return Err("unexpected positional argment".into()),
                    }
                }
            }
        }
        if positional < 1 {
            eprintln!(
                "Very simple tool that accepts SVG path data as an input and prints traced sections as JSON"
            );
            eprintln!("\nUSAGE:");
            eprintln!(
                "    {} [-r <level>] [-t <transform>] [-fill <color>] [-stroke <color>] [-w <width>] [-n] <file.path>",
                cmd
            );
            eprintln!("\nARGS:");
            eprintln!("    -r <level>         curve sampling resolution level (default: 0)");
            eprintln!("    -t <transform>     apply transform");
            eprintln!("    -fill <color>      fill color or 'none' (default: #000000)");
            eprintln!("    -stroke <color>    stroke color or 'none' (default: #000000)");
            eprintln!("    -w <width>         stroke width (default: 1)");
            eprintln!("    -n                 trace whole path as a single section");
            eprintln!("    <file.path>        file containing SVG path data ('-' means stdin)");
            std::process::exit(1);
        }
        Ok(result)
    }
}

/// Load path data from the file
fn path_load(path: &str) -> Result<String, Error> {
    let mut contents = String::new();
    if path != "-" {
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
    } else {
        std::io::stdin().read_to_string(&mut contents)?;
    }
    Ok(contents)
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    let data = path_load(&args.input_file)?;
    let path = Path::new(data, args.style, args.tr, args.options)?;

    let sections = path.sections()?;
    let enclosed = sections
        .iter()
        .filter(|section| section.is_enclosed())
        .count();
    tracing::debug!(
        "[trace:summary] sections={} enclosed={} bbox={:?}",
        sections.len(),
        enclosed,
        path.bbox()?
    );

    let output = tracing::debug_span!("[json]").in_scope(|| path.to_json())?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
