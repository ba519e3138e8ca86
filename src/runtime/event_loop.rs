use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::player::PlaybackController;
use crate::transport::{Transport, TransportEvent};

use super::command;
use super::console::{Console, Flow};

const POLL: Duration = Duration::from_millis(50);

/// Read stdin on its own thread so the loop can keep draining transport events.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if tx.send(l).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
    });
    rx
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

/// Main console loop: forwards transport events, fires due error skips and
/// runs commands. Returns when the user quits or stdin closes.
pub fn run<T: Transport>(
    player: &mut PlaybackController<T>,
    events: &Receiver<TransportEvent>,
    console: &Console<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let lines = spawn_stdin_reader();
    prompt();

    loop {
        while let Ok(event) = events.try_recv() {
            player.handle_event(event);
        }
        player.tick(Instant::now());

        match lines.recv_timeout(POLL) {
            Ok(line) => {
                if line.trim().is_empty() {
                    prompt();
                    continue;
                }
                match command::parse(&line) {
                    Ok(cmd) => {
                        if console.execute(cmd, player) == Flow::Quit {
                            break;
                        }
                    }
                    Err(msg) => println!("{msg}"),
                }
                prompt();
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                tracing::info!("stdin closed");
                break;
            }
        }
    }

    Ok(())
}
