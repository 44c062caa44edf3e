/// Pixel rectangle inside a page buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoiRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

/// Kernel length covering +/- 3 sigma, forced odd so it has a center tap.
pub fn kernel_size_for_sigma(sigma: f32) -> usize {
    ((sigma.max(0.0) * 6.0).ceil() as usize) | 1
}

/// Normalized 1D Gaussian kernel of odd length `kernel_size`.
///
/// A non-positive sigma yields an identity kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    debug_assert!(kernel_size % 2 == 1, "kernel size must be odd");
    let center = kernel_size / 2;
    if sigma <= 0.0 {
        return (0..kernel_size)
            .map(|i| if i == center { 1.0 } else { 0.0 })
            .collect();
    }

    let two_sigma_sq = 2.0 * (sigma as f64).powi(2);
    let weights: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let d = i as f64 - center as f64;
            (-d * d / two_sigma_sq).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / total) as f32).collect()
}

/// For every output position along an axis of length `len`, the source
/// position of each kernel tap, clamped to `0..len`.
fn clamped_taps(len: usize, kernel_len: usize) -> Vec<usize> {
    let half = kernel_len as isize / 2;
    let last = len as isize - 1;
    (0..len as isize)
        .flat_map(|pos| (0..kernel_len as isize).map(move |k| (pos + k - half).clamp(0, last) as usize))
        .collect()
}

/// Separable Gaussian over a whole buffer, reusing `temp` between calls.
///
/// Taps that fall past the buffer edge repeat the edge pixel, so the buffer
/// is blurred as if nothing existed outside it.
pub fn separable_blur(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) {
    let k = kernel.len();
    if k <= 1 || width == 0 || height == 0 {
        return;
    }
    let stride = width * channels;
    temp.clear();
    temp.resize(stride * height, 0.0);

    let x_taps = clamped_taps(width, k);
    for (src_row, dst_row) in data.chunks_exact(stride).zip(temp.chunks_exact_mut(stride)) {
        for (x, taps) in x_taps.chunks_exact(k).enumerate() {
            for c in 0..channels {
                dst_row[x * channels + c] = taps
                    .iter()
                    .zip(kernel)
                    .map(|(&sx, &w)| src_row[sx * channels + c] as f32 * w)
                    .sum();
            }
        }
    }

    let y_taps = clamped_taps(height, k);
    for (y, taps) in y_taps.chunks_exact(k).enumerate() {
        let dst_row = &mut data[y * stride..(y + 1) * stride];
        for (i, out) in dst_row.iter_mut().enumerate() {
            let sum: f32 = taps
                .iter()
                .zip(kernel)
                .map(|(&sy, &w)| temp[sy * stride + i] * w)
                .sum();
            *out = to_u8(sum);
        }
    }
}

/// Copies the pixels under `rect` out of a page buffer into `roi`.
pub fn copy_roi_out(
    data: &[u8],
    page_width: usize,
    channels: usize,
    rect: RoiRect,
    roi: &mut Vec<u8>,
) {
    let (start, len) = (rect.x * channels, rect.w * channels);
    roi.clear();
    for row in data.chunks_exact(page_width * channels).skip(rect.y).take(rect.h) {
        roi.extend_from_slice(&row[start..start + len]);
    }
}

/// Pastes a buffer produced by [`copy_roi_out`] back over `rect`.
pub fn copy_roi_in(data: &mut [u8], roi: &[u8], page_width: usize, channels: usize, rect: RoiRect) {
    let (start, len) = (rect.x * channels, rect.w * channels);
    let rows = data.chunks_exact_mut(page_width * channels).skip(rect.y);
    for (dst, src) in rows.zip(roi.chunks_exact(len)) {
        dst[start..start + len].copy_from_slice(src);
    }
}

/// Blurs an extracted ROI in place.
///
/// With `scale > 1` the ROI is area-averaged down by `scale`, blurred with
/// `small_kernel` and bilinearly scaled back up. ROIs too small to shrink
/// use the full `kernel` directly.
#[allow(clippy::too_many_arguments)]
pub fn blur_roi(
    roi: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    small_kernel: &[f32],
    scale: usize,
    temp: &mut Vec<f32>,
) {
    if scale <= 1 || width < scale * 2 || height < scale * 2 {
        separable_blur(roi, width, height, channels, kernel, temp);
        return;
    }
    let (mut small, sw, sh) = downscale(roi, width, height, channels, scale);
    separable_blur(&mut small, sw, sh, channels, small_kernel, temp);
    let restored = upscale(&small, sw, sh, channels, width, height);
    roi[..restored.len()].copy_from_slice(&restored);
}

/// Integer-factor shrink by averaging each `scale` x `scale` block.
///
/// Trailing rows and columns that do not fill a whole block are dropped.
pub fn downscale(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    scale: usize,
) -> (Vec<u8>, usize, usize) {
    let (out_w, out_h) = (width / scale, height / scale);
    let block = (scale * scale) as u32;
    let mut out = Vec::with_capacity(out_w * out_h * channels);

    for by in 0..out_h {
        for bx in 0..out_w {
            for c in 0..channels {
                let mut sum = 0u32;
                for y in by * scale..(by + 1) * scale {
                    for x in bx * scale..(bx + 1) * scale {
                        sum += data[(y * width + x) * channels + c] as u32;
                    }
                }
                out.push((sum / block) as u8);
            }
        }
    }

    (out, out_w, out_h)
}

/// Bilinear resize to `target_w` x `target_h`, with corners aligned.
pub fn upscale(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    target_w: usize,
    target_h: usize,
) -> Vec<u8> {
    let sample_axis = |pos: usize, src_len: usize, dst_len: usize| {
        let ratio = (src_len as f32 - 1.0) / (dst_len as f32 - 1.0).max(1.0);
        let s = pos as f32 * ratio;
        let lo = (s.floor() as usize).min(src_len - 1);
        (lo, (lo + 1).min(src_len - 1), s - lo as f32)
    };
    let at = |x: usize, y: usize, c: usize| data[(y * width + x) * channels + c] as f32;

    let mut out = Vec::with_capacity(target_w * target_h * channels);
    for ty in 0..target_h {
        let (y0, y1, fy) = sample_axis(ty, height, target_h);
        for tx in 0..target_w {
            let (x0, x1, fx) = sample_axis(tx, width, target_w);
            for c in 0..channels {
                let top = at(x0, y0, c) + (at(x1, y0, c) - at(x0, y0, c)) * fx;
                let bottom = at(x0, y1, c) + (at(x1, y1, c) - at(x0, y1, c)) * fx;
                out.push(to_u8(top + (bottom - top) * fy));
            }
        }
    }
    out
}

fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
