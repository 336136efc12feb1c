use edgecam::filter::{BACKGROUND, EDGE};
use edgecam::{process, Error, FrameFilter, FrameLayout, Mode};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Build a frame from a luma generator, chroma filled with a ramp
fn make_frame(width: usize, height: usize, luma: impl Fn(usize, usize) -> u8) -> Vec<u8> {
    let layout = FrameLayout::new(width as u32, height as u32).unwrap();
    let mut data = vec![0u8; layout.total_len()];
    for y in 0..height {
        for x in 0..width {
            data[y * width + x] = luma(x, y);
        }
    }
    for (i, c) in data[layout.luma_len()..].iter_mut().enumerate() {
        *c = (i * 7 + 3) as u8;
    }
    data
}

fn random_frame(rng: &mut StdRng, width: usize, height: usize) -> Vec<u8> {
    let layout = FrameLayout::new(width as u32, height as u32).unwrap();
    let mut data = vec![0u8; layout.total_len()];
    rng.fill(&mut data[..]);
    data
}

fn run(input: &[u8], width: usize, height: usize, mode: Mode) -> Vec<u8> {
    let mut output = vec![0xAAu8; input.len()];
    process(input, width as u32, height as u32, &mut output, mode).unwrap();
    output
}

fn is_border(x: usize, y: usize, width: usize, height: usize) -> bool {
    x == 0 || y == 0 || x == width - 1 || y == height - 1
}

#[test]
fn passthrough_is_identity() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let (w, h) = (rng.random_range(1..40), rng.random_range(1..40));
        let input = random_frame(&mut rng, w, h);
        assert_eq!(run(&input, w, h, Mode::PassThrough), input);
    }
}

#[test]
fn edge_detect_preserves_chroma_and_border() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let (w, h) = (rng.random_range(1..40), rng.random_range(1..40));
        let input = random_frame(&mut rng, w, h);
        let output = run(&input, w, h, Mode::EdgeDetect);
        let luma_len = w * h;

        assert_eq!(&output[luma_len..], &input[luma_len..], "chroma {}x{}", w, h);
        for y in 0..h {
            for x in 0..w {
                let idx = y * w + x;
                if is_border(x, y, w, h) {
                    assert_eq!(output[idx], input[idx], "border ({}, {})", x, y);
                } else {
                    assert!(
                        output[idx] == EDGE || output[idx] == BACKGROUND,
                        "interior ({}, {}) = {}",
                        x,
                        y,
                        output[idx]
                    );
                }
            }
        }
    }
}

#[test]
fn input_is_never_mutated_and_calls_are_deterministic() {
    let mut rng = StdRng::seed_from_u64(3);
    let input = random_frame(&mut rng, 33, 17);
    let snapshot = input.clone();

    let first = run(&input, 33, 17, Mode::EdgeDetect);
    let second = run(&input, 33, 17, Mode::EdgeDetect);
    assert_eq!(first, second);
    assert_eq!(input, snapshot);
}

#[test]
fn parallel_scan_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(5);
    let sequential = FrameFilter::new();
    let parallel = FrameFilter::new().with_parallel(true);

    for (w, h) in [(3, 3), (64, 48), (127, 31), (2, 9), (320, 240)] {
        let input = random_frame(&mut rng, w, h);
        let mut a = vec![0u8; input.len()];
        let mut b = vec![0u8; input.len()];
        sequential
            .process(&input, w as u32, h as u32, &mut a, Mode::EdgeDetect)
            .unwrap();
        parallel
            .process(&input, w as u32, h as u32, &mut b, Mode::EdgeDetect)
            .unwrap();
        assert_eq!(a, b, "{}x{}", w, h);
    }
}

#[test]
fn flat_frame_has_no_edges() {
    for value in [0u8, 1, 128, 255] {
        let input = make_frame(16, 9, |_, _| value);
        let output = run(&input, 16, 9, Mode::EdgeDetect);
        for y in 1..8 {
            for x in 1..15 {
                assert_eq!(output[y * 16 + x], BACKGROUND);
            }
        }
    }
}

#[test]
fn bright_column_marks_its_flank() {
    let input = make_frame(4, 4, |x, _| if x == 2 { 255 } else { 0 });
    let output = run(&input, 4, 4, Mode::EdgeDetect);

    // x = 1 sees 0 on the left and 255 on the right
    assert_eq!(output[4 + 1], EDGE);
    assert_eq!(output[2 * 4 + 1], EDGE);
    // x = 2 has equal flanks, so its horizontal gradient cancels
    assert_eq!(output[4 + 2], BACKGROUND);
    assert_eq!(output[2 * 4 + 2], BACKGROUND);
    // Border keeps the input column
    assert_eq!(output[2], 255);
    assert_eq!(output[3 * 4 + 2], 255);
}

#[test]
fn bright_column_far_pixels_stay_dark() {
    let input = make_frame(10, 6, |x, _| if x == 2 { 255 } else { 0 });
    let output = run(&input, 10, 6, Mode::EdgeDetect);
    for y in 1..5 {
        let row = &output[y * 10..(y + 1) * 10];
        assert_eq!(row[1], EDGE);
        assert_eq!(row[2], BACKGROUND);
        assert_eq!(row[3], EDGE);
        assert!(row[4..9].iter().all(|&v| v == BACKGROUND));
    }
}

#[test]
fn block_checkerboard_is_all_edges() {
    for (w, h) in [(8, 8), (9, 7), (12, 10)] {
        let input = make_frame(w, h, |x, y| if (x / 2 + y / 2) % 2 == 0 { 0 } else { 255 });
        let output = run(&input, w, h, Mode::EdgeDetect);
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                assert_eq!(output[y * w + x], EDGE, "{}x{} at ({}, {})", w, h, x, y);
            }
        }
    }
}

#[test]
fn pixel_checkerboard_cancels_out() {
    // Every 3x3 neighborhood is symmetric, so both gradients are zero
    let input = make_frame(8, 8, |x, y| if (x + y) % 2 == 0 { 0 } else { 255 });
    let output = run(&input, 8, 8, Mode::EdgeDetect);
    for y in 1..7 {
        for x in 1..7 {
            assert_eq!(output[y * 8 + x], BACKGROUND);
        }
    }
}

#[test]
fn frames_without_interior_are_copied() {
    for (w, h) in [(2, 2), (2, 10), (10, 2), (1, 1), (1, 5)] {
        let input = make_frame(w, h, |x, y| (x * 31 + y * 17) as u8);
        let output = run(&input, w, h, Mode::EdgeDetect);
        assert_eq!(output, input, "{}x{}", w, h);
    }
}

#[test]
fn mismatched_sizes_are_contract_violations() {
    let input = make_frame(4, 4, |_, _| 9);
    let cases: [(usize, u32, u32); 4] = [(20, 4, 4), (25, 4, 4), (24, 4, 6), (24, 0, 4)];

    for (out_len, w, h) in cases {
        let mut output = vec![0x55u8; out_len];
        let err = process(&input, w, h, &mut output, Mode::EdgeDetect).unwrap_err();
        assert!(err.is_contract_violation(), "{:?}", err);
        assert!(output.iter().all(|&v| v == 0x55), "output touched");
    }

    let mut output = vec![0u8; 24];
    let err = process(&input[..20], 4, 4, &mut output, Mode::PassThrough).unwrap_err();
    assert!(matches!(err, Error::ContractViolation(_)));
}

#[test]
fn unknown_raw_mode_is_rejected() {
    let input = make_frame(4, 4, |_, _| 9);
    let mut output = vec![0u8; input.len()];
    let err = FrameFilter::new()
        .process_raw(&input, 4, 4, &mut output, 2)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedMode(2)));
    assert!(output.iter().all(|&v| v == 0));
}
