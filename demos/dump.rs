use std::path::PathBuf;
use std::time::Instant;

use eyre::Result;
use piweb_drawing::dump_helper;

fn main() -> Result<()> {
    eprintln!("{:<30} {}", "path", "encode + dump time");

    for path in glob::glob("./tests/data/*.json")? {
        let path = path?;
        convert(path)?;
    }

    Ok(())
}

fn convert(path: PathBuf) -> Result<()> {
    let start = Instant::now();

    let stem = path.file_stem().unwrap_or_default();
    let mut drawing_path = std::env::temp_dir().join(stem);
    drawing_path.set_extension("pwd");
    dump_helper::encode(&path, Some(drawing_path.clone()))?;

    let mut text_path = drawing_path.clone();
    text_path.set_extension("txt");
    dump_helper::dump(&drawing_path, Some(text_path.clone()))?;

    eprintln!("{:<30} {:?}", text_path.display(), start.elapsed());

    Ok(())
}
