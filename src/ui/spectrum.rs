use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use crate::visualizer::block_count;

/// Columns of stacked blocks, one column per magnitude, drawn bottom-up.
///
/// Columns are separated by a one-cell gap; with `block_height > 1` the top
/// row of every block is left empty so stacks read as separate blocks.
pub struct SpectrumBars<'a> {
    magnitudes: &'a [u8],
    block_height: u16,
    style: Style,
}

impl<'a> SpectrumBars<'a> {
    pub fn new(magnitudes: &'a [u8]) -> Self {
        Self {
            magnitudes,
            block_height: 1,
            style: Style::default(),
        }
    }

    pub fn block_height(mut self, rows: u16) -> Self {
        self.block_height = rows.max(1);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for SpectrumBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.style);
        if area.is_empty() || self.magnitudes.is_empty() {
            return;
        }

        let columns = self.magnitudes.len() as u16;
        let col_width = (area.width / columns).max(1);
        let bar_width = if col_width > 1 { col_width - 1 } else { 1 };
        let bh = self.block_height;

        for (i, &m) in self.magnitudes.iter().enumerate() {
            let x0 = area.x + i as u16 * col_width;
            if x0 >= area.right() {
                break;
            }

            let blocks = block_count(m, area.height as f32, bh as f32);
            for b in 0..blocks {
                for r in 0..bh {
                    if bh > 1 && r == bh - 1 {
                        continue;
                    }
                    let offset = b * bh + r;
                    if offset >= area.height {
                        break;
                    }
                    let y = area.bottom() - 1 - offset;
                    for x in x0..(x0 + bar_width).min(area.right()) {
                        if let Some(cell) = buf.cell_mut((x, y)) {
                            cell.set_symbol("█").set_style(self.style);
                        }
                    }
                }
            }
        }
    }
}
