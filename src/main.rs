mod config;
mod error;
mod library;
mod logging;
mod notify;
mod player;
mod playlists;
mod runtime;
mod storage;
mod transport;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
