use std::path::PathBuf;

/// One console line, parsed. Positions are 1-based as printed by the listings.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Queue,
    Play(usize),
    Toggle,
    Next,
    Prev,
    Seek(f64),
    Volume(f32),
    Repeat,
    Shuffle,
    Favorite(Option<usize>),
    Favorites,
    Recent,
    Playlists,
    NewPlaylist(String),
    AddToPlaylist { playlist: usize, track: usize },
    RemoveFromPlaylist { playlist: usize, track: usize },
    DropPlaylist(usize),
    Delete(usize),
    Import(Vec<PathBuf>),
    EnqueueAll,
    Status,
    Config,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  list                 show the catalog
  queue                show the play queue
  play <n>             play catalog entry n
  toggle               play/pause
  next | prev          skip forward/back
  seek <secs>          jump within the current track
  vol <0..1>           set volume
  repeat | shuffle     toggle modes
  fav [n]              toggle favorite (current track when n is omitted)
  favs | recent        show favorites / recently played
  playlists            show playlists
  new <name>           create a playlist
  add <pl> <n>         add catalog entry n to playlist pl
  rm <pl> <n>          remove catalog entry n from playlist pl
  drop <pl>            delete playlist pl
  del <n>              delete catalog entry n
  import <path>...     add audio files to the catalog
  enqueue-all          queue the whole catalog
  status               show what is playing
  config               print the effective config
  help                 this text
  quit                 save and exit";

fn position(arg: Option<&str>, what: &str) -> Result<usize, String> {
    let raw = arg.ok_or_else(|| format!("missing {what}"))?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("invalid {what}: {raw}")),
    }
}

fn no_more<'a>(mut rest: impl Iterator<Item = &'a str>) -> Result<(), String> {
    match rest.next() {
        Some(extra) => Err(format!("unexpected argument: {extra}")),
        None => Ok(()),
    }
}

/// Parse a console line. Blank lines are rejected; callers skip them first.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (head, tail) = match line.split_once(char::is_whitespace) {
        Some((h, t)) => (h, t.trim()),
        None => (line, ""),
    };
    let mut args = tail.split_whitespace();

    let cmd = match head.to_ascii_lowercase().as_str() {
        "" => return Err("empty command".to_string()),
        "list" | "ls" => Command::List,
        "queue" | "q" => Command::Queue,
        "play" | "p" => Command::Play(position(args.next(), "track number")?),
        "toggle" | "t" => Command::Toggle,
        "next" | "n" => Command::Next,
        "prev" | "b" => Command::Prev,
        "seek" => {
            let raw = args.next().ok_or("missing seconds")?;
            let secs = raw
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite())
                .ok_or_else(|| format!("invalid seconds: {raw}"))?;
            Command::Seek(secs)
        }
        "vol" | "volume" => {
            let raw = args.next().ok_or("missing volume")?;
            let v = raw
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid volume: {raw}"))?;
            Command::Volume(v)
        }
        "repeat" => Command::Repeat,
        "shuffle" => Command::Shuffle,
        "fav" => match args.next() {
            Some(raw) => Command::Favorite(Some(position(Some(raw), "track number")?)),
            None => Command::Favorite(None),
        },
        "favs" => Command::Favorites,
        "recent" => Command::Recent,
        "playlists" | "pls" => Command::Playlists,
        "new" => {
            if tail.is_empty() {
                return Err("missing playlist name".to_string());
            }
            return Ok(Command::NewPlaylist(tail.to_string()));
        }
        "add" => Command::AddToPlaylist {
            playlist: position(args.next(), "playlist number")?,
            track: position(args.next(), "track number")?,
        },
        "rm" => Command::RemoveFromPlaylist {
            playlist: position(args.next(), "playlist number")?,
            track: position(args.next(), "track number")?,
        },
        "drop" => Command::DropPlaylist(position(args.next(), "playlist number")?),
        "del" => Command::Delete(position(args.next(), "track number")?),
        "import" => {
            let paths: Vec<PathBuf> = tail.split_whitespace().map(PathBuf::from).collect();
            if paths.is_empty() {
                return Err("missing path".to_string());
            }
            return Ok(Command::Import(paths));
        }
        "enqueue-all" => Command::EnqueueAll,
        "status" | "s" => Command::Status,
        "config" => Command::Config,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    no_more(args)?;
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_commands_and_aliases() {
        assert_eq!(parse("list"), Ok(Command::List));
        assert_eq!(parse("  NEXT "), Ok(Command::Next));
        assert_eq!(parse("b"), Ok(Command::Prev));
        assert_eq!(parse("enqueue-all"), Ok(Command::EnqueueAll));
        assert_eq!(parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn parses_numeric_arguments() {
        assert_eq!(parse("play 3"), Ok(Command::Play(3)));
        assert_eq!(parse("seek 12.5"), Ok(Command::Seek(12.5)));
        assert_eq!(parse("vol 0.3"), Ok(Command::Volume(0.3)));
        assert_eq!(parse("fav"), Ok(Command::Favorite(None)));
        assert_eq!(parse("fav 2"), Ok(Command::Favorite(Some(2))));
        assert_eq!(
            parse("add 1 4"),
            Ok(Command::AddToPlaylist {
                playlist: 1,
                track: 4
            })
        );
    }

    #[test]
    fn playlist_names_keep_spaces() {
        assert_eq!(
            parse("new  Late night mix "),
            Ok(Command::NewPlaylist("Late night mix".to_string()))
        );
        assert!(parse("new").is_err());
    }

    #[test]
    fn import_takes_several_paths() {
        assert_eq!(
            parse("import /a.mp3 b.flac"),
            Ok(Command::Import(vec!["/a.mp3".into(), "b.flac".into()]))
        );
        assert!(parse("import").is_err());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse("").is_err());
        assert!(parse("play").is_err());
        assert!(parse("play 0").is_err());
        assert!(parse("play x").is_err());
        assert!(parse("seek inf").is_err());
        assert!(parse("vol NaN").is_err());
        assert!(parse("next 2").is_err());
        assert!(parse("dance").unwrap_err().contains("unknown command"));
    }
}
