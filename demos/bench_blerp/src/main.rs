use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;

use blerp::field::{FieldError, FieldSize, ValueField};
use blerp::scale::{ScaleBuffers, ScaleVariant};

#[derive(FromArgs)]
/// Time repeated bilinear upscaling of a random field
struct Args {
    /// the scaler to time
    #[argh(option, short = 'v', default = "ScaleVariant::U32x4")]
    variant: ScaleVariant,

    /// width and height of the source field
    #[argh(option, short = 's', default = "37")]
    size: usize,

    /// the upscaling factor
    #[argh(option, default = "8")]
    scale: usize,

    /// the number of timed calls
    #[argh(option, short = 'n', default = "1000")]
    iterations: u32,

    /// the seed of the random source field
    #[argh(option, default = "1")]
    seed: u64,

    /// time every variant in turn
    #[argh(switch)]
    all: bool,
}

fn allocate(size: usize, scale: usize, seed: u64) -> Result<ScaleBuffers, FieldError> {
    let dst = size
        .checked_mul(scale)
        .ok_or(FieldError::AllocationFailed(usize::MAX))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut src = ValueField::<f32, 4>::try_from_size_val([size, size].into(), 0.0)?;
    src.as_slice_mut().iter_mut().for_each(|v| *v = rng.random());

    ScaleBuffers::new(src, FieldSize { width: dst, height: dst })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut buffers = match allocate(args.size, args.scale, args.seed) {
        Ok(buffers) => buffers,
        Err(FieldError::AllocationFailed(bytes)) => {
            log::error!("could not allocate {bytes} bytes");
            println!("allocation failed");
            std::process::exit(-1);
        }
        Err(e) => return Err(e.into()),
    };

    log::info!(
        "upscaling {}x{} by {} with seed {}",
        args.size,
        args.size,
        args.scale,
        args.seed
    );

    let variants = if args.all {
        ScaleVariant::ALL.to_vec()
    } else {
        vec![args.variant]
    };

    for variant in variants {
        if let Some(backend) = variant.backend() {
            log::info!("{variant} dispatches to {backend}");
        }

        let start = Instant::now();
        for _ in 0..args.iterations {
            buffers.run(variant)?;
        }
        let elapsed = start.elapsed();

        println!(
            "{variant}: {} calls in {elapsed:.3?} ({:.3?} per call)",
            args.iterations,
            elapsed / args.iterations.max(1)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_reports_failure() {
        assert!(matches!(
            allocate(usize::MAX / 2, 8, 1),
            Err(FieldError::AllocationFailed(_))
        ));
    }

    #[test]
    fn allocate_fixed_benchmark() -> Result<(), FieldError> {
        let mut buffers = allocate(37, 8, 1)?;
        buffers.run(ScaleVariant::U32x4)?;
        assert_eq!(buffers.output(ScaleVariant::U32x4)?.size(), FieldSize::from([296, 296]));
        Ok(())
    }
}
