//! Command line arguments and dispatch of the single action they select
//!
//! Only the first action flag (`-l`, `-a`, `-d`, `-h`) on the command line is honoured; anything after it, including unknown options, is ignored. Modifier flags (`-v`, `-j`) can appear anywhere before an error. Operands (arguments not starting with `-`) are accepted and ignored.
use clap::error::{ContextKind, ContextValue};
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, Parser};
use std::ffi::OsString;

use crate::display;
use crate::error::{Error, ErrorKind, Result};
use crate::host::UsbSession;
use crate::reset;
use crate::usb::VidPid;

/// Exit code for success, also help and no arguments
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for usage errors and failed operations
pub const EXIT_FAILURE: i32 = 1;

/// List attached USB devices and reset one or all non-hub devices
#[derive(Parser, Debug, Default)]
#[command(
    name = "usbreset",
    version,
    override_usage = "usbreset [-ald]",
    help_template = "usage: {usage}\n{options}",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Args {
    /// Reset all non Hub devices
    #[arg(short = 'a', default_value_t = false)]
    pub all: bool,

    /// List all devices
    #[arg(short = 'l', default_value_t = false)]
    pub list: bool,

    /// Reset device with VID:PID. values must be hex.
    // the value is the next word even if it starts with '-'; repeats append so the first is kept
    #[arg(
        short = 'd',
        value_name = "vendorID:productID",
        action = clap::ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub device: Vec<String>,

    /// Print this usage text
    #[arg(short = 'h', default_value_t = false)]
    pub help: bool,

    /// List devices as JSON, with names from the usb-ids database
    #[arg(short = 'j', long, default_value_t = false)]
    pub json: bool,

    /// Increase verbosity, repeat for more (-vv debug, -vvv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Ignored operands
    #[arg(hide = true)]
    pub operands: Vec<OsString>,
}

/// The one action an invocation runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `-l`
    List,
    /// `-a`
    ResetAll,
    /// `-d` with its unparsed argument; parsed on dispatch so a malformed pair is reported there
    ResetDevice(String),
    /// `-h`, or no action flag at all
    Help,
}

/// Runtime settings taken from the modifier flags
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Number of `-v`
    pub verbosity: u8,
    /// `-j`
    pub json: bool,
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Action to run
    pub command: Command,
    /// Modifiers
    pub settings: Settings,
}

fn from_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// The action flag with the lowest position on the command line
fn first_action(matches: &ArgMatches) -> Option<Command> {
    let mut actions: Vec<(usize, Command)> = Vec::new();

    for (id, command) in [
        ("list", Command::List),
        ("all", Command::ResetAll),
        ("help", Command::Help),
    ] {
        if from_command_line(matches, id) {
            if let Some(index) = matches.index_of(id) {
                actions.push((index, command));
            }
        }
    }

    if from_command_line(matches, "device") {
        // first occurrence; index_of is the index of the first value
        if let (Some(index), Some(value)) = (
            matches.index_of("device"),
            matches
                .get_many::<String>("device")
                .and_then(|mut values| values.next()),
        ) {
            actions.push((index, Command::ResetDevice(value.to_owned())));
        }
    }

    actions
        .into_iter()
        .min_by_key(|(index, _)| *index)
        .map(|(_, command)| command)
}

/// Defaults are not applied when clap stops at an error, so no get_flag/get_count here
fn settings(matches: &ArgMatches) -> Settings {
    Settings {
        verbosity: matches.get_one::<u8>("verbose").copied().unwrap_or(0),
        json: matches.get_one::<bool>("json").copied().unwrap_or(false),
    }
}

/// Convert a clap parse error to the message reported to the user
fn usage_error(error: &clap::Error) -> Error {
    let arg = match error.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(s)) => s.to_owned(),
        _ => String::new(),
    };

    match error.kind() {
        clap::error::ErrorKind::UnknownArgument => {
            Error::new(ErrorKind::InvalidArg, &format!("Unknown option `{}'.", arg))
        }
        _ if arg.starts_with("-d") => {
            Error::new(ErrorKind::InvalidArg, "Option -d requires an argument.")
        }
        _ => Error::new(
            ErrorKind::InvalidArg,
            error.to_string().lines().next().unwrap_or("invalid arguments"),
        ),
    }
}

/// Parse `args` (including the binary name) into an [`Invocation`]
///
/// An error is returned only if no action flag precedes the offending argument; the caller should report it then print usage.
pub fn parse_command<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    let strict_error = match Args::command().try_get_matches_from(&args) {
        Ok(matches) => {
            return Ok(Invocation {
                command: first_action(&matches).unwrap_or(Command::Help),
                settings: settings(&matches),
            })
        }
        Err(e) => e,
    };
    log::debug!("Argument error: {}", strict_error);

    // clap stops at the first error, so any action it matched came before it
    if let Ok(matches) = Args::command()
        .ignore_errors(true)
        .try_get_matches_from(&args)
    {
        if let Some(command) = first_action(&matches) {
            log::debug!("Running {:?} ahead of argument error", command);
            return Ok(Invocation {
                command,
                settings: settings(&matches),
            });
        }
    }

    Err(usage_error(&strict_error))
}

/// Usage text rendered from [`Args`]
pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Print [`usage`] to stdout
pub fn print_usage() {
    print!("{}", usage());
}

fn with_session<S, F, R>(open_session: F, run: R) -> i32
where
    S: UsbSession,
    F: FnOnce() -> Result<S>,
    R: FnOnce(&S) -> Result<i32>,
{
    let session = match open_session() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERR: {:#}", e);
            return EXIT_FAILURE;
        }
    };

    match run(&session) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERR: {:#}", e);
            EXIT_FAILURE
        }
    }
}

/// Run the action of `invocation`, opening a session with `open_session` if it needs one, and return the process exit code
pub fn dispatch<S, F>(invocation: &Invocation, open_session: F) -> i32
where
    S: UsbSession,
    F: FnOnce() -> Result<S>,
{
    log::trace!("Dispatch {:?}", invocation);

    match &invocation.command {
        Command::Help => {
            print_usage();
            EXIT_SUCCESS
        }
        Command::List => with_session(open_session, |session| {
            let records = crate::enumerate::list_devices(session)?;
            display::print_devices(&records, invocation.settings.json)?;
            Ok(EXIT_SUCCESS)
        }),
        // per-device failures are reported by the resetter and do not change the exit code
        Command::ResetAll => with_session(open_session, |session| {
            reset::reset_all_devices(session).map(|_| EXIT_SUCCESS)
        }),
        Command::ResetDevice(arg) => {
            let target: VidPid = match arg.parse() {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("ERR: {:#}", e);
                    print_usage();
                    return EXIT_FAILURE;
                }
            };

            with_session(open_session, |session| {
                if reset::reset_matching_device(session, &target)? {
                    Ok(EXIT_SUCCESS)
                } else {
                    Ok(EXIT_FAILURE)
                }
            })
        }
    }
}
