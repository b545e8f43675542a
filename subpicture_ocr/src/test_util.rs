//! Test-only utilities.

use crate::frame::SubPicture;

/// Build a row-major grayscale buffer from ASCII art: `#` becomes a white
/// ink sample, everything else background.  Short rows are padded to the
/// longest one.
pub fn bitmap_data(rows: &[&str]) -> (Vec<u8>, usize, usize) {
    let height = rows.len();
    let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    let mut data = vec![0u8; width * height];
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == '#' {
                data[y * width + x] = 0xff;
            }
        }
    }
    (data, width, height)
}

/// Wrap ASCII art into a decoded subpicture with the given 90 kHz
/// show/hide timestamps.
pub fn subpicture(rows: &[&str], start_pts: u64, end_pts: u64) -> SubPicture {
    let (data, width, height) = bitmap_data(rows);
    SubPicture {
        data,
        width,
        height,
        start_pts,
        end_pts,
        packet_pts: start_pts,
    }
}

#[test]
fn bitmap_data_pads_short_rows() {
    let (data, width, height) = bitmap_data(&["##", "#"]);
    assert_eq!((width, height), (2, 2));
    assert_eq!(data, vec![0xff, 0xff, 0xff, 0]);
}
