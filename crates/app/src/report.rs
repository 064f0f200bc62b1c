//! Builds the project report in the spreadsheet layout the workshop uses.

use engine::{PartLookup, Project, compute_budget};

use crate::error::Result;

const TITLE: &str = "Marcena - Relatório de Projeto";
const ITEM_HEADER: [&str; 6] = [
    "PEÇA",
    "CATEGORIA",
    "QUANTIDADE",
    "UNIDADE",
    "PREÇO UNIT. (VENDA)",
    "SUBTOTAL (VENDA)",
];

/// Renders `project` as a `;`-separated report, priced against `parts`.
///
/// Lines whose part is gone from the catalog are left out, matching the
/// budget totals. The bytes start with a UTF-8 BOM so spreadsheet tools
/// pick the right encoding.
pub fn render_csv(project: &Project, parts: &(impl PartLookup + ?Sized)) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::from("\u{FEFF}"));

    writer.write_record([TITLE])?;
    writer.write_record(["Projeto:", project.name.as_str()])?;
    let date = project.created_at.format("%d/%m/%Y").to_string();
    writer.write_record(["Data:", date.as_str()])?;
    writer.write_record([""])?;

    writer.write_record(ITEM_HEADER)?;
    for item in &project.items {
        let Some(part) = parts.part(&item.part_id) else {
            continue;
        };
        let quantity = item.quantity.to_string();
        let price = part.price.to_string();
        let subtotal = part.price.times(item.quantity).to_string();
        writer.write_record([
            part.name.as_str(),
            part.category.as_str(),
            quantity.as_str(),
            part.unit.as_str(),
            price.as_str(),
            subtotal.as_str(),
        ])?;
    }
    writer.write_record([""])?;

    let summary = compute_budget(&project.items, parts);
    writer.write_record(["RESUMO FINANCEIRO"])?;
    let cost = summary.total_cost.to_string();
    writer.write_record(["CUSTO TOTAL DE MATERIAIS:", cost.as_str()])?;
    let sale = summary.total_sale.to_string();
    writer.write_record(["VALOR TOTAL DO ORÇAMENTO:", sale.as_str()])?;
    let profit = summary.profit().to_string();
    writer.write_record(["LUCRO BRUTO ESTIMADO:", profit.as_str()])?;
    let margin = format!("{:.1}%", summary.margin_percent());
    writer.write_record(["MARGEM DE LUCRO:", margin.as_str()])?;

    Ok(writer.into_inner().map_err(|err| err.into_error())?)
}

/// File name for a saved report, with whitespace runs collapsed to `_`.
pub fn report_filename(project: &Project) -> String {
    let name = project
        .name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("Orcamento_{name}.csv")
}

#[cfg(test)]
mod tests {
    use engine::{Catalog, ProjectItem, Quantity};

    use super::*;

    fn table_project() -> Project {
        Project::new(
            "Mesa de Centro".to_string(),
            String::new(),
            vec![
                ProjectItem::new("1", Quantity::from_hundredths(200)),
                ProjectItem::new("2", Quantity::from_hundredths(400)),
            ],
        )
    }

    fn report_lines(project: &Project, catalog: &Catalog) -> Vec<String> {
        let data = render_csv(project, catalog).unwrap();
        let text = String::from_utf8(data).unwrap();
        let text = text.strip_prefix('\u{FEFF}').expect("missing BOM");
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn report_follows_the_workshop_layout() {
        let catalog = Catalog::seeded();
        let project = table_project();

        let lines = report_lines(&project, &catalog);

        assert_eq!(lines[0], "Marcena - Relatório de Projeto");
        assert_eq!(lines[1], "Projeto:;Mesa de Centro");
        assert!(lines[2].starts_with("Data:;"));
        assert_eq!(lines[3], "");
        assert_eq!(
            lines[4],
            "PEÇA;CATEGORIA;QUANTIDADE;UNIDADE;PREÇO UNIT. (VENDA);SUBTOTAL (VENDA)"
        );
        assert_eq!(lines[5], "Placa MDF 18mm Branca;Madeira;2;un;85.50€;171.00€");
        assert_eq!(lines[6], "Dobradiça Caneco 35mm;Ferragem;4;un;4.20€;16.80€");
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "RESUMO FINANCEIRO");
        assert_eq!(lines[9], "CUSTO TOTAL DE MATERIAIS:;97.20€");
        assert_eq!(lines[10], "VALOR TOTAL DO ORÇAMENTO:;187.80€");
        assert_eq!(lines[11], "LUCRO BRUTO ESTIMADO:;90.60€");
        assert_eq!(lines[12], "MARGEM DE LUCRO:;48.2%");
        assert_eq!(lines.len(), 13);
    }

    #[test]
    fn report_skips_lines_without_a_part() {
        let catalog = Catalog::seeded();
        let project = Project::new(
            "Prateleira".to_string(),
            String::new(),
            vec![
                ProjectItem::new("999", Quantity::from_hundredths(300)),
                ProjectItem::new("7", Quantity::from_hundredths(250)),
            ],
        );

        let lines = report_lines(&project, &catalog);

        assert!(lines.iter().all(|line| !line.contains("999")));
        assert_eq!(
            lines[5],
            "Fita de Borda PVC 22mm (Metro);Acabamento;2.5;m;1.15€;2.88€"
        );
        assert_eq!(lines[9], "CUSTO TOTAL DE MATERIAIS:;1.13€");
        assert_eq!(lines[10], "VALOR TOTAL DO ORÇAMENTO:;2.88€");
    }

    #[test]
    fn report_filename_collapses_whitespace() {
        let project = Project::new(
            "Mesa  de\tJantar Luxo".to_string(),
            String::new(),
            vec![],
        );

        assert_eq!(report_filename(&project), "Orcamento_Mesa_de_Jantar_Luxo.csv");
    }
}
