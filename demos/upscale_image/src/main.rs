use argh::FromArgs;
use std::path::PathBuf;

use blerp::field::{convert, msdf, FieldSize, ValueField};
use blerp::scale::{ScaleBuffers, ScaleVariant};

#[derive(FromArgs)]
/// Upscale an image with one of the bilinear field scalers
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// path to write the upscaled image to
    #[argh(option, short = 'o')]
    output_path: PathBuf,

    /// the upscaling factor
    #[argh(option, default = "8")]
    scale: usize,

    /// the scaler to use
    #[argh(option, short = 'v', default = "ScaleVariant::Full")]
    variant: ScaleVariant,

    /// treat the RGB channels as a multi-channel distance field and write their median
    #[argh(switch)]
    msdf: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // read the image as normalized RGBA
    let image = image::open(&args.image_path)?.into_rgba8();
    let size = FieldSize {
        width: image.width() as usize,
        height: image.height() as usize,
    };
    let src = convert::rgba_from_rgba8(size, image.as_raw())?;

    let new_size = FieldSize {
        width: size.width * args.scale,
        height: size.height * args.scale,
    };
    log::info!("upscaling {size} to {new_size} with {}", args.variant);

    let mut buffers = ScaleBuffers::new(src, new_size)?;
    buffers.run(args.variant)?;
    let upscaled = buffers.output(args.variant)?;

    let (width, height) = (new_size.width as u32, new_size.height as u32);

    if args.msdf {
        // drop alpha and reduce the three distance channels to one
        let rgb = upscaled
            .as_slice()
            .chunks_exact(4)
            .flat_map(|px| px[..3].iter().copied())
            .collect();
        let rgb = ValueField::<f32, 3>::new(new_size, rgb)?;
        let mut distance = ValueField::<f32, 1>::zeros(new_size)?;
        msdf::median_field(&rgb, &mut distance)?;

        let gray = distance
            .as_slice()
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
            .collect();
        image::GrayImage::from_raw(width, height, gray)
            .ok_or("distance buffer does not match the image size")?
            .save(&args.output_path)?;
    } else {
        image::RgbaImage::from_raw(width, height, convert::to_rgba8(&upscaled))
            .ok_or("output buffer does not match the image size")?
            .save(&args.output_path)?;
    }

    log::info!("wrote {}", args.output_path.display());

    Ok(())
}
