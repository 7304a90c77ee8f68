//! Helper functions that work with drawing files using only their paths.
//!
//! Drawing files hold the command buffer and the highlight buffer of a
//! drawing, each as a length-prefixed blob.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use eyre::{Context, Result};

use crate::decode::Decoder;
use crate::format::Rect;
use crate::measure::measure;
use crate::script;
use crate::text_format::render_text;
use crate::writer::BufferWriter;

fn output_path(in_path: &Path, out_path: Option<PathBuf>, extension: &str) -> PathBuf {
    out_path.unwrap_or_else(|| {
        let mut out_path = in_path.to_owned();
        out_path.set_extension(extension);

        out_path
    })
}

/// Dump a drawing file as text. If the output path is not specified, it is
/// determined by replacing the extension of the input path with `.txt`.
///
/// ```no_run
/// # use piweb_drawing::dump_helper::dump;
/// dump("data/sample.pwd", Some("data/sample.txt".into())).unwrap();
/// ```
pub fn dump(in_path: impl AsRef<Path>, out_path: Option<PathBuf>) -> Result<()> {
    let data = std::fs::read(&in_path).wrap_err("failed to read drawing file")?;
    let (commands, highlights) =
        Decoder::decode_container(&data).wrap_err("failed to decode drawing")?;

    let out_path = output_path(in_path.as_ref(), out_path, "txt");
    let mut file =
        BufWriter::new(File::create(out_path).wrap_err("failed to create output file")?);
    render_text(&commands, &highlights, &mut file)?;
    file.flush()?;

    Ok(())
}

/// Record a JSON script into a drawing file. If the output path is not
/// specified, the extension of the input path is replaced with `.pwd`.
pub fn encode(in_path: impl AsRef<Path>, out_path: Option<PathBuf>) -> Result<()> {
    let json = std::fs::read_to_string(&in_path).wrap_err("failed to read script")?;
    let operations = script::parse(&json).wrap_err("failed to parse script")?;
    let drawing = script::run(&operations).wrap_err("failed to record script")?;

    let mut writer = BufferWriter::with_capacity(drawing.drawing_buffer().len() + 8);
    drawing.serialize_with_highlights(&mut writer)?;

    let out_path = output_path(in_path.as_ref(), out_path, "pwd");
    std::fs::write(out_path, writer.data()).wrap_err("failed to create output file")?;

    Ok(())
}

/// Bounds of the drawing stored in a drawing file, [`Rect::ZERO`] when it
/// draws nothing
pub fn measure_file(in_path: impl AsRef<Path>) -> Result<Rect> {
    let data = std::fs::read(&in_path).wrap_err("failed to read drawing file")?;
    let (commands, _) = Decoder::decode_container(&data).wrap_err("failed to decode drawing")?;

    Ok(measure(&commands)?.unwrap_or(Rect::ZERO))
}
