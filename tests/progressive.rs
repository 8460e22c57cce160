extern crate wavecos;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wavecos::prelude::*;

fn random_image(side: usize, seed: u64) -> PixelGrid {
    let mut random = StdRng::seed_from_u64(seed);
    let pixels = (0 .. side * side).map(|_| random.random::<[u8; 3]>()).collect();
    PixelGrid::new(Vec2(side, side), pixels)
}

fn left_half(grid: &PixelGrid) -> PixelGrid {
    crop_columns(grid, 0, grid.resolution.width() / 2)
}

fn right_half(grid: &PixelGrid) -> PixelGrid {
    let half = grid.resolution.width() / 2;
    crop_columns(grid, half, half)
}

fn crop_columns(grid: &PixelGrid, start: usize, width: usize) -> PixelGrid {
    let height = grid.resolution.height();
    let pixels = (0 .. height)
        .flat_map(|y| (start .. start + width).map(move |x| Vec2(x, y)))
        .map(|position| grid.get_pixel(position))
        .collect();

    PixelGrid::new(Vec2(width, height), pixels)
}

#[test]
fn dct_progression_emits_every_coefficient_count() {
    let codec = Codec::new(CodecConfig::default()).unwrap();
    let image = random_image(512, 1);
    let encoded = codec.encode(&image).unwrap();

    let frames: Vec<Frame> = Progression::new(&codec, &encoded, Schedule::Dct).unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(frames.len(), 64);

    for (index, frame) in frames.iter().enumerate() {
        assert_eq!(frame.step.iteration, index + 1);
        assert_eq!(frame.step.dct_budget, Some((index + 1) * 4096));
        assert_eq!(frame.step.dwt_budget, None);
        assert_eq!(frame.image.resolution, Vec2(512, 512));
    }

    assert_eq!(frames[0].image, codec.decode_dct(&encoded, 4096).unwrap());
    assert_eq!(frames[63].image, image);

    let first_error = frames[0].image.mean_absolute_error(&image);
    assert!(first_error > 0.0);
}

#[test]
fn dwt_progression_adds_one_level_per_frame() {
    let codec = Codec::new(CodecConfig::default()).unwrap();
    let image = random_image(512, 2);
    let encoded = codec.encode(&image).unwrap();

    let frames: Vec<Frame> = Progression::new(&codec, &encoded, Schedule::Dwt).unwrap().collect::<Result<_>>().unwrap();
    let budgets: Vec<usize> = frames.iter().map(|frame| frame.step.dwt_budget.unwrap()).collect();
    assert_eq!(budgets, vec![1, 4, 16, 64, 256, 1024, 4096, 16_384, 65_536, 262_144]);

    // a single retained coefficient makes every channel uniform
    for channel in 0 .. 3 {
        let plane = frames[0].image.channel_plane(channel);
        let first = plane.samples()[0];
        assert!(plane.samples().iter().all(|&sample| sample == first));
    }

    assert_eq!(frames[9].image, image);
}

#[test]
fn balanced_progression_shows_both_transforms() {
    let config = CodecConfig::default();
    let codec = Codec::new(config).unwrap();
    let image = random_image(512, 3);
    let encoded = codec.encode(&image).unwrap();

    let progression = Progression::new(&codec, &encoded, Schedule::Balanced).unwrap();
    assert_eq!(progression.len(), 64);

    for frame in progression.take(3) {
        let frame = frame.unwrap();
        let iteration = frame.step.iteration;
        assert_eq!(frame.image.resolution, Vec2(1024, 512));

        assert_eq!(left_half(&frame.image), codec.decode_dct(&encoded, iteration * 4096).unwrap());
        assert_eq!(right_half(&frame.image), codec.decode_dwt(&encoded, iteration * 4096 / 64).unwrap());
    }
}

#[test]
fn progression_can_stop_early_and_restart() {
    let codec = Codec::new(CodecConfig::new(32, 8).unwrap()).unwrap();
    let image = random_image(32, 4);
    let encoded = codec.encode(&image).unwrap();
    let snapshot = encoded.clone();

    let partial: Vec<Frame> = Progression::new(&codec, &encoded, Schedule::Dct).unwrap().take(5).collect::<Result<_>>().unwrap();
    assert_eq!(partial.len(), 5);

    let complete: Vec<Frame> = Progression::new(&codec, &encoded, Schedule::Dct).unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(complete.len(), 64);
    assert_eq!(&complete[.. 5], &partial[..]);

    assert_eq!(encoded.dct(), snapshot.dct());
    assert_eq!(encoded.dwt(), snapshot.dwt());
}

#[test]
fn small_planes_have_shorter_wavelet_progressions() {
    let config = CodecConfig::new(32, 8).unwrap();
    assert_eq!(Schedule::Dwt.len(&config), 6);
    assert_eq!(Schedule::Dct.len(&config), 64);
    assert_eq!(Schedule::Balanced.len(&config), 64);

    let last = Schedule::Dwt.steps(&config).last().unwrap();
    assert_eq!(last.dwt_budget, Some(32 * 32));
}
