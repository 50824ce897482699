use std::env;
use std::fs::{self, File};
use std::io::BufReader;

use gcbanner::Result;
use gcbanner::anim::Icons;
use gcbanner::formats::Banner;
use gcbanner::writer::{CodecWriter, ImageWriter};

fn main() -> Result<()> {
    let path = env::args().nth(1).unwrap_or_else(|| "banner.bin".to_owned());
    let banner = Banner::load(&mut BufReader::new(File::open(&path)?))?;

    println!("{path}: {} \"{}\"", banner.kind().name(), banner.title());

    let writer = CodecWriter::default();
    fs::write("banner.png", writer.write_still(&banner.banner_image()?)?)?;

    match banner.icons()? {
        Icons::None => println!("no icon"),
        Icons::Still(img) => fs::write("icon.png", writer.write_still(&img)?)?,
        Icons::Animated(seq) => {
            println!("{} frames, {:?}", seq.frames.len(), seq.mode);
            for (i, frame) in seq.frames.iter().enumerate() {
                fs::write(format!("icon.{i:02}.png"), writer.write_still(frame)?)?;
            }
        }
    }

    Ok(())
}
