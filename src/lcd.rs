//! Monochrome pixmap to LCD buffer transcoding.
//!
//! Callers hand in a row-major, MSB-first 160x43 bitmap. The LCD controller
//! stores pixels in 8 row tall pages, one byte per pixel column, with the top
//! row of the page in bit 0. Transcoding therefore transposes each 8x8 block of
//! the input and bit-reverses the result before it lands in the write buffer.

use crate::decode::reverse_bits_in_byte;

/// LCD width in pixels
pub const LCD_WIDTH: usize = 160;
/// LCD height in pixels
pub const LCD_HEIGHT: usize = 43;
/// Offset of the pixel data within the write buffer
pub const LCD_OFFSET: usize = 32;
/// Full length of an LCD write
pub const LCD_BUFFER_LEN: usize = 0x03e0;
/// Size of a caller supplied pixmap in bytes
pub const PIXMAP_LEN: usize = LCD_WIDTH * LCD_HEIGHT / 8;

/// Output report id of the LCD write
const LCD_REPORT_ID: u8 = 0x03;
/// Bytes per pixmap row
const ROW_BYTES: usize = LCD_WIDTH / 8;
/// Number of 8 row pages on the panel
const PAGES: usize = LCD_HEIGHT.div_ceil(8);

const _: () = assert!(LCD_OFFSET + PAGES * LCD_WIDTH == LCD_BUFFER_LEN);

/// Write the fixed command header into the start of an LCD buffer
pub fn write_header(buf: &mut [u8; LCD_BUFFER_LEN]) {
    buf[..LCD_OFFSET].fill(0);
    buf[0] = LCD_REPORT_ID;
}

/// Transpose an 8x8 bit block.
///
/// `rows[j]` holds 8 horizontally adjacent pixels of row j, MSB first. The
/// result holds one byte per pixel column with row 0 in the MSB.
#[inline(always)]
fn transpose(rows: [u8; 8]) -> [u8; 8] {
    let mut cols = [0u8; 8];
    for (i, col) in cols.iter_mut().enumerate() {
        for (j, row) in rows.iter().enumerate() {
            *col |= ((row >> (7 - i)) & 1) << (7 - j);
        }
    }
    cols
}

/// Transcode `pixmap` into a complete LCD write buffer.
///
/// `pixmap` must be exactly [`PIXMAP_LEN`] bytes; length is checked by the caller.
pub fn encode_pixmap(pixmap: &[u8], buf: &mut [u8; LCD_BUFFER_LEN]) {
    debug_assert_eq!(pixmap.len(), PIXMAP_LEN);
    write_header(buf);

    for page in 0..PAGES {
        for byte_col in 0..ROW_BYTES {
            let mut rows = [0u8; 8];
            for (j, row) in rows.iter_mut().enumerate() {
                let y = page * 8 + j;
                if y < LCD_HEIGHT {
                    *row = pixmap[y * ROW_BYTES + byte_col];
                }
            }

            let start = LCD_OFFSET + page * LCD_WIDTH + byte_col * 8;
            for (out, col) in buf[start..start + 8].iter_mut().zip(transpose(rows)) {
                *out = reverse_bits_in_byte(col);
            }
        }
    }
}
