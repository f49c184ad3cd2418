//! Bill document export.
//!
//! The fixed layout (title block, customer and period header, tabular body,
//! total row, net-payable line) is a pure function of an already-retrieved
//! bill; rendering it to a PDF and writing the file are separate, later steps
//! so that a failed export never involves store state.

use anyhow::{anyhow, Context, Result};
use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element};
use log::info;
use std::path::PathBuf;

use shared::{BillResponse, ExportBillResponse};

const BILL_TITLE: &str = "Patil Milk Products Pvt. Ltd.";
const BILL_SUBTITLE: &str = "Milk Bill";
const FONT_FAMILY: &str = "LiberationSans";
const COLUMNS: [&str; 7] = ["Date", "Session", "Animal", "Qty (L)", "Fat %", "Rate", "Amount"];

/// The fixed bill layout as renderable text, one entry per visual element.
/// Quantity and rate are formatted to 2 decimal places, fat to 1, amounts to 2.
#[derive(Debug, Clone, PartialEq)]
pub struct BillLayout {
    pub title: String,
    pub subtitle: String,
    pub customer_line: String,
    pub period_line: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_row: Vec<String>,
    pub net_payable_line: String,
}

/// Renders bill layouts to PDF files in a configured export directory.
#[derive(Clone)]
pub struct ExportService {
    fonts_dir: PathBuf,
    export_dir: PathBuf,
}

impl ExportService {
    pub fn new(fonts_dir: PathBuf, export_dir: PathBuf) -> Self {
        Self { fonts_dir, export_dir }
    }

    /// Deterministic export file name from customer name and date range.
    pub fn bill_filename(&self, bill: &BillResponse) -> String {
        format!(
            "Bill_{}_{}_{}.pdf",
            bill.customer.name.replace(' ', "_"),
            bill.start_date,
            bill.end_date
        )
    }

    /// Build the fixed layout for a bill. Pure: depends only on the rows and
    /// total already gathered.
    pub fn layout_bill(&self, bill: &BillResponse) -> BillLayout {
        let rows = bill
            .lines
            .iter()
            .map(|line| {
                vec![
                    line.date.to_string(),
                    line.session.to_string(),
                    line.animal_type.to_string(),
                    format!("{:.2}", line.quantity_liters),
                    format!("{:.1}", line.fat),
                    format!("{:.2}", line.rate),
                    format!("{:.2}", line.amount),
                ]
            })
            .collect();

        let mut total_row = vec![String::new(); COLUMNS.len() - 2];
        total_row.push("Total".to_string());
        total_row.push(format!("{:.2}", bill.total));

        BillLayout {
            title: BILL_TITLE.to_string(),
            subtitle: BILL_SUBTITLE.to_string(),
            customer_line: format!("Customer: {}", bill.customer.name),
            period_line: format!("Bill From: {} To: {}", bill.start_date, bill.end_date),
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
            total_row,
            net_payable_line: format!("Net Payable Amount: {:.2}", bill.total),
        }
    }

    /// Render the bill to a PDF in the export directory and report the path.
    pub fn export_bill(&self, bill: &BillResponse) -> Result<ExportBillResponse> {
        let layout = self.layout_bill(bill);
        let filename = self.bill_filename(bill);

        let doc = self.render(&layout)?;

        std::fs::create_dir_all(&self.export_dir).with_context(|| {
            format!("Failed to create export directory {}", self.export_dir.display())
        })?;
        let file_path = self.export_dir.join(&filename);
        doc.render_to_file(&file_path)
            .map_err(|e| anyhow!("Failed to write bill PDF {}: {}", file_path.display(), e))?;

        info!(
            "Exported bill for {} ({} lines) to {}",
            bill.customer.name,
            bill.lines.len(),
            file_path.display()
        );

        Ok(ExportBillResponse {
            filename,
            file_path: file_path.to_string_lossy().to_string(),
            line_count: bill.lines.len(),
        })
    }

    fn render(&self, layout: &BillLayout) -> Result<Document> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, FONT_FAMILY, None)
            .map_err(|e| anyhow!("Failed to load fonts from {}: {}", self.fonts_dir.display(), e))?;

        let mut doc = Document::new(font_family);
        doc.set_title(layout.subtitle.clone());
        doc.set_font_size(10);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(
            Paragraph::new(layout.title.clone())
                .aligned(Alignment::Center)
                .styled(Style::new().bold().with_font_size(14)),
        );
        doc.push(
            Paragraph::new(layout.subtitle.clone())
                .aligned(Alignment::Center)
                .styled(Style::new().bold()),
        );
        doc.push(Break::new(1));
        doc.push(Paragraph::new(layout.customer_line.clone()));
        doc.push(Paragraph::new(layout.period_line.clone()));
        doc.push(Break::new(1));

        let mut table = TableLayout::new(vec![3, 3, 3, 2, 2, 2, 3]);
        table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

        let mut header = table.row();
        for column in &layout.columns {
            header.push_element(Paragraph::new(column.clone()).styled(Style::new().bold()));
        }
        header.push().map_err(|e| anyhow!("Invalid bill header row: {}", e))?;

        for cells in layout.rows.iter().chain(std::iter::once(&layout.total_row)) {
            let mut row = table.row();
            for cell in cells {
                row.push_element(Paragraph::new(cell.clone()));
            }
            row.push().map_err(|e| anyhow!("Invalid bill table row: {}", e))?;
        }
        doc.push(table);

        doc.push(Break::new(1));
        doc.push(Paragraph::new(layout.net_payable_line.clone()).styled(Style::new().bold()));

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{AnimalType, BillLine, CustomerRef, Session};

    fn sample_bill() -> BillResponse {
        BillResponse {
            customer: CustomerRef {
                code: 1,
                name: "Ravi Kumar".to_string(),
            },
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            lines: vec![
                BillLine {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    session: Session::Morning,
                    animal_type: AnimalType::Cow,
                    quantity_liters: 10.0,
                    fat: 4.0,
                    rate: 40.0,
                    amount: 400.0,
                },
                BillLine {
                    date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                    session: Session::Evening,
                    animal_type: AnimalType::Buffalo,
                    quantity_liters: 7.25,
                    fat: 6.55,
                    rate: 52.5,
                    amount: 380.625,
                },
            ],
            total: 780.625,
        }
    }

    fn service() -> ExportService {
        ExportService::new(PathBuf::from("./fonts"), PathBuf::from("."))
    }

    #[test]
    fn test_filename_is_deterministic() {
        let filename = service().bill_filename(&sample_bill());
        assert_eq!(filename, "Bill_Ravi_Kumar_2024-01-01_2024-01-31.pdf");
    }

    #[test]
    fn test_layout_header_block() {
        let layout = service().layout_bill(&sample_bill());
        assert_eq!(layout.title, "Patil Milk Products Pvt. Ltd.");
        assert_eq!(layout.subtitle, "Milk Bill");
        assert_eq!(layout.customer_line, "Customer: Ravi Kumar");
        assert_eq!(layout.period_line, "Bill From: 2024-01-01 To: 2024-01-31");
    }

    #[test]
    fn test_layout_rows_use_fixed_precision() {
        let layout = service().layout_bill(&sample_bill());

        assert_eq!(layout.rows.len(), 2);
        assert_eq!(
            layout.rows[0],
            vec!["2024-01-01", "Morning", "Cow", "10.00", "4.0", "40.00", "400.00"]
        );
        // qty/rate to 2 places, fat to 1, amount rounded at presentation only
        assert_eq!(
            layout.rows[1],
            vec!["2024-01-02", "Evening", "Buffalo", "7.25", "6.5", "52.50", "380.62"]
        );
    }

    #[test]
    fn test_layout_total_and_net_payable() {
        let layout = service().layout_bill(&sample_bill());

        assert_eq!(layout.total_row.len(), layout.columns.len());
        assert_eq!(layout.total_row[5], "Total");
        assert_eq!(layout.total_row[6], "780.62");
        assert_eq!(layout.net_payable_line, "Net Payable Amount: 780.62");
    }

    #[test]
    fn test_empty_bill_still_has_total_row() {
        let mut bill = sample_bill();
        bill.lines.clear();
        bill.total = 0.0;

        let layout = service().layout_bill(&bill);
        assert!(layout.rows.is_empty());
        assert_eq!(layout.total_row[6], "0.00");
        assert_eq!(layout.net_payable_line, "Net Payable Amount: 0.00");
    }
}
