use fielddef::read::inspect::inspect;
use flate2::read::GzDecoder;
use std::io::Read;

const USAGE: &str = "usage: fdinspect [--base64] <filename>";

fn main() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let (is_base64, filename) = match args.next() {
        Some(flag) if flag == "--base64" => (true, args.next()),
        other => (false, other),
    };
    let filename = filename.ok_or_else(|| USAGE.to_string())?;

    let mut data =
        std::fs::read(&filename).map_err(|e| format!("Error opening {filename}: {e:?}"))?;
    if filename.ends_with(".gz") {
        let mut inflated = Vec::new();
        GzDecoder::new(&data[..])
            .read_to_end(&mut inflated)
            .map_err(|e| format!("Error inflating {filename}: {e:?}"))?;
        data = inflated;
    }
    if is_base64 {
        let text = String::from_utf8_lossy(&data);
        data = base64::decode(text.trim()).map_err(|e| format!("Error decoding base64: {e:?}"))?;
    }

    let table = inspect(&data)?;
    println!("{table}");
    Ok(())
}
