//! Input side: stdin or the upstream command, read line by line.
//!
//! SIGINT is installed without `SA_RESTART` so a blocked `read` returns
//! `EINTR` and the main loop can stop and flush instead of dying.

use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::{
    io::{self, BufRead, IsTerminal},
    process::{Child, Command, Stdio},
    sync::atomic::{AtomicBool, Ordering},
};
use thiserror::Error;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no command given to read logs from")]
    EmptyCommand,
    #[error("could not run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("could not install interrupt handler: {0}")]
    Signal(String),
}

extern "C" fn handle_sigint(_signal: nix::libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub fn install_interrupt_handler() -> Result<(), InputError> {
    let action = SigAction::new(
        SigHandler::Handler(handle_sigint),
        SaFlags::empty(),
        SigSet::empty(),
    );
    // Safety: the handler only touches an atomic.
    unsafe { sigaction(Signal::SIGINT, &action) }
        .map_err(|e| InputError::Signal(e.to_string()))?;
    Ok(())
}

pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Reads up to and including the next `\n` into `buf`. Returns the number of
/// bytes read, 0 at end of input.
///
/// Unlike `BufRead::read_until`, an `Interrupted` error is returned to the
/// caller once SIGINT was received.
pub fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<usize> {
    let mut read = 0;
    loop {
        let (done, used) = {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted && !interrupted() => continue,
                Err(e) => return Err(e),
            };
            match available.iter().position(|b| *b == b'\n') {
                Some(i) => {
                    buf.extend_from_slice(&available[..=i]);
                    (true, i + 1)
                }
                None => {
                    buf.extend_from_slice(available);
                    (available.is_empty(), available.len())
                }
            }
        };
        reader.consume(used);
        read += used;
        if done {
            return Ok(read);
        }
    }
}

pub struct Input {
    pub reader: Box<dyn BufRead>,
    child: Option<Child>,
}

impl Input {
    /// Reads stdin when something is piped in, otherwise runs `command` and
    /// reads its stdout.
    pub fn open(command: &[String]) -> Result<Input, InputError> {
        if !io::stdin().is_terminal() {
            log::debug!("Reading from stdin");
            return Ok(Input::from_reader(Box::new(io::stdin().lock())));
        }
        Input::spawn(command)
    }

    pub fn from_reader(reader: Box<dyn BufRead>) -> Input {
        Input {
            reader,
            child: None,
        }
    }

    pub fn spawn(command: &[String]) -> Result<Input, InputError> {
        let (program, args) = command.split_first().ok_or(InputError::EmptyCommand)?;
        log::debug!("Executing command: {}", command.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| InputError::Spawn {
                command: command.join(" "),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| InputError::Spawn {
            command: command.join(" "),
            source: io::Error::new(io::ErrorKind::Other, "no stdout"),
        })?;

        Ok(Input {
            reader: Box::new(io::BufReader::new(stdout)),
            child: Some(child),
        })
    }

    /// Stops the upstream command, if any, and reaps it.
    pub fn close(self) {
        let Input { reader, child } = self;
        drop(reader);
        if let Some(mut child) = child {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            match child.wait() {
                Ok(status) => log::debug!("Command exited with {}", status),
                Err(e) => log::debug!("Could not wait for command: {}", e),
            }
        }
    }
}
