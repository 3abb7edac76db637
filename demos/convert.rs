//! Converts cubic bezier curves given as JSON into quadratic splines
#![deny(warnings)]

use cu2qu::*;
use std::{
    env,
    fs::File,
    io::{Read, Write},
};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    input_file: String,
    max_err: Scalar,
    options: ConvertOptions,
    compatible: bool,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut result = Args {
            input_file: String::new(),
            max_err: max_err_for_upem(1000.0, DEFAULT_MAX_ERR_EM),
            options: ConvertOptions::default(),
            compatible: false,
        };
        let mut positional = 0;
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "convert".to_string());
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => {
                    positional = 0;
                    break;
                }
                "-e" => {
                    let max_err: Scalar = args.next().ok_or("-e requires argument")?.parse()?;
                    if max_err.is_nan() || max_err < 0.0 {
                        return Err("max error must be a non-negative number".into());
                    }
                    result.max_err = max_err;
                }
                "-n" => {
                    let max_n: usize = args.next().ok_or("-n requires argument")?.parse()?;
                    result.options = result.options.with_max_n(max_n);
                }
                "-c" => {
                    result.compatible = true;
                }
                _ => {
                    positional += 1;
                    match positional {
                        1 => result.input_file = arg,
                        _ => return Err("unexpected positional argument".into()),
                    }
                }
            }
        }
        if positional < 1 {
            eprintln!("Converts cubic bezier curves into quadratic splines");
            eprintln!("\nUSAGE:");
            eprintln!("    {} [-e <max_err>] [-n <max_n>] [-c] <curves.json>", cmd);
            eprintln!("\nARGS:");
            eprintln!(
                "    -e <max_err>       maximum approximation error (default: {})",
                result.max_err
            );
            eprintln!(
                "    -n <max_n>         maximum number of segments per curve (default: {})",
                MAX_N
            );
            eprintln!("    -c                 convert all curves to the same number of segments");
            eprintln!(
                "    <curves.json>      file containing array of cubics, each an array of four [x, y] ('-' means stdin)"
            );
            std::process::exit(1);
        }
        Ok(result)
    }
}

/// Load curves from the file
fn curves_load(path: &str) -> Result<Vec<Cubic>, Error> {
    let mut contents = String::new();
    if path != "-" {
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
    } else {
        std::io::stdin().read_to_string(&mut contents)?;
    }
    Ok(tracing::debug_span!("[parse]").in_scope(|| serde_json::from_str(&contents))?)
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    let curves = curves_load(&args.input_file)?;
    tracing::debug!("[curves:count] {}", curves.len());

    let mut stats = SplineStats::new();
    let splines = if args.compatible {
        let max_errors = vec![args.max_err; curves.len()];
        let splines = tracing::debug_span!("[convert]")
            .in_scope(|| curves_to_quadratic_with(curves.iter().copied(), &max_errors, &args.options))?;
        stats.record_batch(&splines);
        splines
    } else {
        let _span = tracing::debug_span!("[convert]").entered();
        let mut splines = Vec::with_capacity(curves.len());
        for curve in curves.iter() {
            let spline = curve_to_quadratic_with(*curve, args.max_err, &args.options)?;
            stats.record(&spline);
            splines.push(spline);
        }
        splines
    };

    for (curve, spline) in curves.iter().zip(splines.iter()) {
        tracing::debug!(
            "[error] {:?} -> {}",
            curve,
            spline.max_sampled_error(*curve, 16)
        );
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, &splines)?;
    writeln!(out)?;
    eprint!("{}", stats);
    Ok(())
}
