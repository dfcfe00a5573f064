//! Paginated timesheet renderer on top of `pdf-writer`.

use crate::core::timesheet::Timesheet;
use crate::export::RenderContext;
use crate::models::{DaySummary, Rgb};
use crate::utils::formatting::{hours2readable, money};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};
use std::ops::Range;

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

const HEADER_FILL: Rgb = Rgb(0.94, 0.94, 0.94);
const STRIPE_FILL: Rgb = Rgb(0.98, 0.98, 0.98);

const COLUMNS: [(&str, f32); 5] = [
    ("Date", 120.0),
    ("Clock In", 90.0),
    ("Clock Out", 90.0),
    ("Hours", 90.0),
    ("Earnings", 105.0),
];

/// Page geometry in PDF points (A4 portrait by default).
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub page_w: f32,
    pub page_h: f32,
    pub margin: f32,
    pub row_h: f32,
    /// Height of the branding / client / period block on the first page.
    pub report_header_h: f32,
    pub totals_gap: f32,
    pub totals_h: f32,
    /// Space under the totals band for the "Generated on" lines.
    pub footer_h: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            page_w: 595.0,
            page_h: 842.0,
            margin: 50.0,
            row_h: 20.0,
            report_header_h: 108.0,
            totals_gap: 8.0,
            totals_h: 24.0,
            footer_h: 32.0,
        }
    }
}

impl Layout {
    fn top(&self) -> f32 {
        self.page_h - self.margin
    }

    /// Bottom edge of the column header band.
    pub fn band_y(&self, first_page: bool) -> f32 {
        if first_page {
            self.top() - self.report_header_h - self.row_h
        } else {
            self.top() - self.row_h
        }
    }

    /// Rows that fit under the band; a row fits while its bottom edge stays
    /// at or above the bottom margin.
    pub fn rows_per_page(&self, first_page: bool) -> usize {
        let first_row_y = self.band_y(first_page) - self.row_h;
        if first_row_y < self.margin {
            return 0;
        }
        ((first_row_y - self.margin) / self.row_h).floor() as usize + 1
    }

    /// Split `rows` into consecutive per-page ranges. Every index appears in
    /// exactly one range; a zero-row table still gets one (empty) page.
    pub fn paginate(&self, rows: usize) -> Vec<Range<usize>> {
        let first = self.rows_per_page(true).max(1);
        let next = self.rows_per_page(false).max(1);

        let mut pages = Vec::new();
        let mut start = 0;
        let mut cap = first;

        loop {
            let end = (start + cap).min(rows);
            pages.push(start..end);
            if end >= rows {
                break;
            }
            start = end;
            cap = next;
        }

        pages
    }

    fn table_width(&self) -> f32 {
        COLUMNS.iter().map(|(_, w)| w).sum()
    }

    /// Whether totals + footer fit below a table whose last row's bottom edge
    /// sits at `last_bottom`.
    fn totals_fit(&self, last_bottom: f32) -> bool {
        last_bottom - self.totals_gap - self.totals_h - self.footer_h >= self.margin - 20.0
    }
}

/// Text as single-byte WinAnsi, the encoding the base fonts are declared with.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

pub struct TimesheetPdf {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    info_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    layout: Layout,

    next_id: i32,
    font_id: Ref,
    bold_font_id: Ref,

    font_size: f32,
}

impl TimesheetPdf {
    pub fn new(layout: Layout) -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let bold_font_id = Ref::new(4);
        let info_id = Ref::new(5);
        let next_id = 6;

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_font_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            info_id,
            page_refs: Vec::new(),
            current_content_id: None,
            layout,
            next_id,
            font_id,
            bold_font_id,
            font_size: 10.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    /// Start a new page and return its (empty) content stream.
    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.layout.page_w, self.layout.page_h))
            .contents(content_id);

        page.resources()
            .fonts()
            .pair(FONT_REGULAR, self.font_id)
            .pair(FONT_BOLD, self.bold_font_id);

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &self,
        content: &mut Content,
        x: f32,
        y: f32,
        font: Name,
        size: f32,
        color: Rgb,
        text: &str,
    ) {
        let bytes = win_ansi(text);
        content.save_state();
        content.set_fill_rgb(color.0, color.1, color.2);
        content.begin_text();
        content.set_font(font, size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&bytes));
        content.end_text();
        content.restore_state();
    }

    fn fill_band(&self, content: &mut Content, y: f32, h: f32, color: Rgb) {
        content.save_state();
        content.set_fill_rgb(color.0, color.1, color.2);
        content.rect(self.layout.margin, y, self.layout.table_width(), h);
        content.fill_nonzero();
        content.restore_state();
    }

    fn draw_cells(&self, content: &mut Content, y: f32, cells: &[String], font: Name, color: Rgb) {
        let mut x = self.layout.margin;
        for ((_, w), text) in COLUMNS.iter().zip(cells) {
            self.draw_text(content, x + 4.0, y + 6.0, font, self.font_size, color, text);
            x += w;
        }
    }

    /// Branding, client, period and rate: first page only.
    fn draw_report_header(&self, content: &mut Content, sheet: &Timesheet, ctx: &RenderContext) {
        let x = self.layout.margin;
        let top = self.layout.top();

        self.draw_text(content, x, top - 20.0, FONT_BOLD, 24.0, ctx.accent, &ctx.app_name);
        self.draw_text(content, x, top - 44.0, FONT_REGULAR, 16.0, Rgb::BLACK, "Timesheet Report");

        let period = format!(
            "Period: {} to {}",
            sheet.start.format(&ctx.date_format),
            sheet.end.format(&ctx.date_format)
        );
        let rate = format!(
            "Hourly Rate: {}",
            money(&ctx.currency_symbol, sheet.client.hourly_rate)
        );

        let lines = [format!("Client: {}", sheet.client.name), period, rate];
        for (i, line) in lines.iter().enumerate() {
            let y = top - 68.0 - i as f32 * 16.0;
            self.draw_text(content, x, y, FONT_REGULAR, 12.0, Rgb::BLACK, line);
        }
    }

    fn draw_column_band(&self, content: &mut Content, y: f32) {
        self.fill_band(content, y, self.layout.row_h, HEADER_FILL);
        let headers: Vec<String> = COLUMNS.iter().map(|(h, _)| h.to_string()).collect();
        self.draw_cells(content, y, &headers, FONT_BOLD, Rgb::BLACK);
    }

    fn draw_day_row(
        &self,
        content: &mut Content,
        y: f32,
        index: usize,
        day: &DaySummary,
        ctx: &RenderContext,
    ) {
        if index % 2 == 0 {
            self.fill_band(content, y, self.layout.row_h, STRIPE_FILL);
        }

        let color = if day.has_activity() {
            Rgb::BLACK
        } else {
            Rgb::GREY
        };

        let cells = [
            day.date.format(&ctx.date_format).to_string(),
            day.clock_in_label(),
            day.clock_out_label(),
            hours2readable(day.hours),
            money(&ctx.currency_symbol, day.earnings),
        ];
        self.draw_cells(content, y, &cells, FONT_REGULAR, color);
    }

    /// Accent band with the period totals, then the "generated" footer.
    fn draw_totals(
        &self,
        content: &mut Content,
        last_bottom: f32,
        sheet: &Timesheet,
        ctx: &RenderContext,
    ) {
        let l = &self.layout;
        let band_y = last_bottom - l.totals_gap - l.totals_h;
        self.fill_band(content, band_y, l.totals_h, ctx.accent);

        let text_y = band_y + 8.0;
        let hours_x = l.margin + COLUMNS[..3].iter().map(|(_, w)| w).sum::<f32>() + 4.0;
        let earnings_x = hours_x + COLUMNS[3].1;

        self.draw_text(content, l.margin + 4.0, text_y, FONT_BOLD, 12.0, Rgb::WHITE, "TOTALS:");
        self.draw_text(
            content,
            hours_x,
            text_y,
            FONT_BOLD,
            12.0,
            Rgb::WHITE,
            &format!("{} hours", hours2readable(sheet.totals.hours)),
        );
        self.draw_text(
            content,
            earnings_x,
            text_y,
            FONT_BOLD,
            12.0,
            Rgb::WHITE,
            &money(&ctx.currency_symbol, sheet.totals.earnings),
        );

        self.draw_text(
            content,
            l.margin,
            band_y - 18.0,
            FONT_REGULAR,
            8.0,
            Rgb::GREY,
            &format!("Generated on {}", ctx.generated_on),
        );
        self.draw_text(
            content,
            l.margin,
            band_y - 28.0,
            FONT_REGULAR,
            8.0,
            Rgb::GREY,
            &format!("Powered by {} Time Tracking", ctx.app_name),
        );
    }

    fn draw_page_number(&self, content: &mut Content, page: usize) {
        self.draw_text(
            content,
            self.layout.page_w - self.layout.margin - 60.0,
            self.layout.margin - 35.0,
            FONT_REGULAR,
            self.font_size,
            Rgb::GREY,
            &format!("Page {}", page),
        );
    }

    /// Lay out the whole timesheet: header block, one row per day split over
    /// as many pages as needed (column band redrawn on each), then totals.
    pub fn write_timesheet(&mut self, sheet: &Timesheet, ctx: &RenderContext) {
        let layout = self.layout;
        let pages = layout.paginate(sheet.days.len());

        for (page_idx, range) in pages.iter().enumerate() {
            let first_page = page_idx == 0;
            let mut content = self.new_page();

            if first_page {
                self.draw_report_header(&mut content, sheet, ctx);
            }

            let band_y = layout.band_y(first_page);
            self.draw_column_band(&mut content, band_y);

            let mut y = band_y - layout.row_h;
            for i in range.clone() {
                self.draw_day_row(&mut content, y, i, &sheet.days[i], ctx);
                y -= layout.row_h;
            }

            self.draw_page_number(&mut content, page_idx + 1);

            let is_last = page_idx + 1 == pages.len();
            if !is_last {
                self.finalize_page(content);
                continue;
            }

            let last_bottom = y + layout.row_h;
            if layout.totals_fit(last_bottom) {
                self.draw_totals(&mut content, last_bottom, sheet, ctx);
                self.finalize_page(content);
            } else {
                self.finalize_page(content);

                let mut overflow = self.new_page();
                let band_y = layout.band_y(false);
                self.draw_column_band(&mut overflow, band_y);
                self.draw_totals(&mut overflow, band_y, sheet, ctx);
                self.draw_page_number(&mut overflow, page_idx + 2);
                self.finalize_page(overflow);
            }
        }
    }

    /// Close the document tree and return the encoded bytes.
    pub fn finish(mut self, title: &str) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);

        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.iter().copied());
        drop(pages);

        self.pdf
            .document_info(self.info_id)
            .title(TextStr(title))
            .producer(TextStr("timely"));

        self.pdf.finish()
    }
}

/// Render a timesheet into PDF bytes.
pub fn render_timesheet(sheet: &Timesheet, ctx: &RenderContext, layout: Layout) -> Vec<u8> {
    let mut doc = TimesheetPdf::new(layout);
    doc.write_timesheet(sheet, ctx);

    let title = format!(
        "Timesheet {} {} to {}",
        sheet.client.name, sheet.start, sheet.end
    );
    doc.finish(&title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_covers_every_row_once() {
        let layout = Layout::default();
        let first = layout.rows_per_page(true);
        let next = layout.rows_per_page(false);
        assert!(next > first);

        let rows = first + next + 3;
        let pages = layout.paginate(rows);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], 0..first);
        assert_eq!(pages[1], first..first + next);
        assert_eq!(pages[2], first + next..rows);
    }

    #[test]
    fn paginate_single_page_when_rows_fit() {
        let layout = Layout::default();
        assert_eq!(layout.paginate(7), vec![0..7]);
        assert_eq!(layout.paginate(0), vec![0..0]);
    }

    #[test]
    fn win_ansi_maps_latin1_and_euro() {
        assert_eq!(win_ansi("Zoë €"), vec![b'Z', b'o', 0xEB, b' ', 0x80]);
        assert_eq!(win_ansi("東"), vec![b'?']);
    }
}
