//! Entry point for hostmetrics_cli. Parses args, reads a capture (file or
//! stdin) and prints the parsed metrics as JSON on stdout.

use anyhow::{bail, Context, Result};
use hostmetrics::{collect_metrics, parse_output, Invocation, Metrics, OsType};
use serde::Serialize;
use std::env;
use std::fs;
use std::io::{self, Read};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const OS_ENV: &str = "HOSTMETRICS_OS";
const LOG_ENV: &str = "HOSTMETRICS_LOG";

#[derive(Debug, Default, PartialEq)]
struct ParsedArgs {
    os: Option<OsType>,
    input: Option<String>,
    invocation: bool,
    pretty: bool,
    commands: bool,
    help: bool,
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--os linux|windows|-o linux|windows] [--invocation|-i] [--pretty] [--commands] [FILE]\n\
         Reads captured output from FILE (or stdin) and prints metrics as JSON.\n\
         --invocation  input is an invocation record {{\"Status\": ..., \"StandardOutputContent\": ...}}\n\
         --commands    print the remote commands for --os and exit\n\
         {OS_ENV} sets the OS when --os is absent; {LOG_ENV} (or RUST_LOG) sets the log filter."
    )
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let _ = it.next(); // program name
    let mut parsed = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--os" | "-o" => {
                let v = it.next().ok_or("--os needs a value")?;
                parsed.os = Some(v.parse()?);
            }
            "--invocation" | "-i" => parsed.invocation = true,
            "--pretty" => parsed.pretty = true,
            "--commands" => parsed.commands = true,
            _ if arg.starts_with("--os=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    parsed.os = Some(v.parse()?);
                }
            }
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(format!("Unknown option: {arg}"));
            }
            _ => {
                if parsed.input.is_some() {
                    return Err(format!("Unexpected argument: {arg}"));
                }
                parsed.input = Some(arg);
            }
        }
    }
    Ok(parsed)
}

fn init_logging() {
    let filter = env::var(LOG_ENV)
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

// Panics recovered by the parser still surface, as one log record instead of
// raw stderr text next to the JSON output.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| error!("panic: {info}")));
}

fn resolve_os(flag: Option<OsType>) -> Result<OsType> {
    if let Some(os) = flag {
        return Ok(os);
    }
    match env::var(OS_ENV) {
        Ok(v) => v
            .parse::<OsType>()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid {OS_ENV}")),
        Err(_) => bail!("no OS given: pass --os linux|windows or set {OS_ENV}"),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
        Some(p) => fs::read_to_string(p).with_context(|| format!("failed to read {p}")),
    }
}

/// Output envelope, same shape as the automation module result.
#[derive(Serialize)]
struct ModuleResult<'a> {
    changed: bool,
    metrics: &'a Metrics,
}

#[derive(Serialize)]
struct CommandList {
    document: &'static str,
    commands: &'static [&'static str],
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn main() -> Result<()> {
    let argv: Vec<String> = env::args().collect();
    let prog = argv
        .first()
        .cloned()
        .unwrap_or_else(|| "hostmetrics_cli".into());
    let parsed = parse_args(argv).map_err(|msg| anyhow::anyhow!("{msg}\n{}", usage(&prog)))?;
    if parsed.help {
        println!("{}", usage(&prog));
        return Ok(());
    }

    init_logging();
    install_panic_hook();
    let os = resolve_os(parsed.os)?;

    if parsed.commands {
        return print_json(
            &CommandList {
                document: os.document_name(),
                commands: os.remote_commands(),
            },
            parsed.pretty,
        );
    }

    let input = read_input(parsed.input.as_deref())?;
    debug!(bytes = input.len(), %os, invocation = parsed.invocation, "read capture");

    let metrics = if parsed.invocation {
        let invocation: Invocation =
            serde_json::from_str(&input).context("input is not an invocation record")?;
        info!(status = %invocation.status, "invocation loaded");
        collect_metrics(&invocation, os)?
    } else {
        parse_output(&input, os)
    };

    print_json(
        &ModuleResult {
            changed: false,
            metrics: &metrics,
        },
        parsed.pretty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn args(v: &[&str]) -> Vec<String> {
        std::iter::once("hostmetrics_cli")
            .chain(v.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn os_long_short_and_assign() {
        assert_eq!(parse_args(args(&["--os", "linux"])).unwrap().os, Some(OsType::Linux));
        assert_eq!(parse_args(args(&["-o", "windows"])).unwrap().os, Some(OsType::Windows));
        assert_eq!(parse_args(args(&["--os=Windows"])).unwrap().os, Some(OsType::Windows));
        assert_eq!(parse_args(args(&[])).unwrap().os, None);
    }

    #[test]
    fn flags_and_input() {
        let p = parse_args(args(&["-i", "--pretty", "capture.txt"])).unwrap();
        assert!(p.invocation && p.pretty && !p.commands);
        assert_eq!(p.input.as_deref(), Some("capture.txt"));
        assert_eq!(parse_args(args(&["-"])).unwrap().input.as_deref(), Some("-"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(args(&["--os", "solaris"])).is_err());
        assert!(parse_args(args(&["--os"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["a.txt", "b.txt"])).is_err());
    }

    #[test]
    fn panics_are_logged_as_records() {
        let logs = Captured::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();

        let previous = std::panic::take_hook();
        install_panic_hook();
        tracing::subscriber::with_default(subscriber, || {
            let caught = std::panic::catch_unwind(|| panic!("disk row out of range"));
            assert!(caught.is_err());
        });
        std::panic::set_hook(previous);

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("ERROR"), "{text}");
        assert!(text.contains("panic:") && text.contains("disk row out of range"), "{text}");
    }
}
