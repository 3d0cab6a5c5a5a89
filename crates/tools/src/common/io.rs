//! 棋譜の読み込みと結果の書き出し（.gz は圧縮として扱う）

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

/// ファイル全体を文字列で読む
pub fn read_text(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut text = String::new();
    if is_gz(path) {
        GzDecoder::new(file).read_to_string(&mut text)?;
    } else {
        io::BufReader::new(file).read_to_string(&mut text)?;
    }
    Ok(text)
}

/// `body` を書き出す。"-" は標準出力
pub fn write_output(path: &Path, body: &[u8]) -> io::Result<()> {
    if path.as_os_str() == "-" {
        let mut out = io::stdout().lock();
        out.write_all(body)?;
        return out.flush();
    }
    let mut file = BufWriter::new(File::create(path)?);
    if is_gz(path) {
        let mut enc = GzEncoder::new(file, Compression::default());
        enc.write_all(body)?;
        return enc.finish()?.flush();
    }
    file.write_all(body)?;
    file.flush()
}

fn is_gz(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}
