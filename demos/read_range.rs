use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use ranged_stream::{BoundedReader, SynchronizedSource};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().expect("usage: read_range <file> [offset] [length]");
    let offset: u64 = args.next().map(|s| s.parse().unwrap()).unwrap_or(0);
    let length: Option<u64> = args.next().map(|s| s.parse().unwrap());

    let source = Arc::new(SynchronizedSource::open(Path::new(&path)).unwrap());

    let mut reader = match length {
        Some(length) => BoundedReader::with_range(source, offset, Some(length)),
        None => BoundedReader::to_end(source, offset),
    }
    .unwrap();

    eprintln!("Reading {} bytes from {} at offset {}", reader.remaining(), path, offset);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let copied = reader.copy_to(&mut out).unwrap();
    out.flush().unwrap();

    eprintln!("\nCopied {} bytes", copied);
}
