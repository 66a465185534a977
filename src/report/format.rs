//! Terminal-formatted tables for panel summaries and the open-items listing.

use crate::abertos::{LinhaFormatada, OpenListing, AVISO_SEM_ABERTOS};
use crate::panel::PanelPlan;
use crate::report::TITULO_GERAL;

/// Format every panel of the plan as a count table, in slot order.
pub fn format_resumo_paineis(plan: &PanelPlan, total_laudos: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {TITULO_GERAL} ===\n"));
    out.push_str(&format!("Total de laudos: {total_laudos}\n"));

    for panel in &plan.panels {
        out.push('\n');
        out.push_str(&format!(
            "{} [{}]\n",
            panel.titulo(),
            panel.encoding.display_name()
        ));

        let series = panel.data.rotulos();
        let total = panel.data.total().max(1);
        for (categoria, quantidade) in &series {
            let pct = 100.0 * *quantidade as f64 / total as f64;
            out.push_str(
                format!(
                    "  {:<28} {:>6} {:>6.1}%",
                    truncate(categoria, 28),
                    quantidade,
                    pct
                )
                .trim_end(),
            );
            out.push('\n');
        }
    }

    for (dim, reason) in &plan.skipped {
        out.push_str(&format!("\n  (painel omitido: {}) {reason}\n", dim.titulo()));
    }

    out
}

/// Format the open-items listing, or the all-clear notice.
pub fn format_abertos(listing: &OpenListing) -> String {
    match listing {
        OpenListing::Vazio => format!("{AVISO_SEM_ABERTOS}\n"),
        OpenListing::Abertos(linhas) => {
            let mut out = String::new();
            out.push_str("Laudos - Tramitação\n");
            out.push_str(&format_tabela_abertos(linhas));
            out
        }
    }
}

fn format_tabela_abertos(linhas: &[LinhaFormatada]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<16} {:>5} {:<12} {:<18} {:<19} {:<24}\n",
            "numero_laudo", "ano", "opm", "responsavel", "recebimento", "observacao"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<16} {:-<5} {:-<12} {:-<18} {:-<19} {:-<24}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for linha in linhas {
        out.push_str(
            format!(
                "{:<16} {:>5} {:<12} {:<18} {:<19} {:<24}\n",
                truncate(&linha.numero_laudo, 16),
                truncate(&linha.ano, 5),
                truncate(&linha.opm, 12),
                truncate(&linha.responsavel_atual, 18),
                linha.recebimento,
                truncate(&linha.observacao, 24),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agg::PanelData;
    use crate::domain::{Dimension, Laudo, YearPolicy};
    use crate::panel::build_plan;

    fn laudo(opm: &str, ano: &str) -> Laudo {
        Laudo {
            id: 0,
            numero_laudo: String::new(),
            ano: ano.to_string(),
            opm: opm.to_string(),
            perito_relator: "P".to_string(),
            marca_arma: "M".to_string(),
            modelo_arma: "Mo".to_string(),
            descricao_exame: "E".to_string(),
        }
    }

    #[test]
    fn resumo_lists_panels_in_slot_order_with_caption() {
        let laudos = vec![laudo("A", "2020"), laudo("A", "2021"), laudo("B", "2020")];
        let plan = build_plan(&[Dimension::Opm, Dimension::Ano], &laudos, YearPolicy::AbortAll)
            .unwrap();
        let text = format_resumo_paineis(&plan, laudos.len());

        assert!(text.contains(TITULO_GERAL));
        assert!(text.contains("Total de laudos: 3"));
        let pos_opm = text.find("Laudos por OPM").unwrap();
        let pos_ano = text.find("Laudos por Ano").unwrap();
        assert!(pos_opm < pos_ano);
        assert!(text.contains("66.7%"));
    }

    #[test]
    fn resumo_reports_skipped_panels() {
        let laudos = vec![laudo("A", "abc")];
        let plan = build_plan(&[Dimension::Opm, Dimension::Ano], &laudos, YearPolicy::Partial)
            .unwrap();
        let text = format_resumo_paineis(&plan, laudos.len());
        assert!(text.contains("painel omitido"));
        assert!(text.contains("Laudos por Ano"));
    }

    #[test]
    fn abertos_table_has_all_columns() {
        let listing = OpenListing::Abertos(vec![LinhaFormatada {
            numero_laudo: "L-001/2020".to_string(),
            ano: "2020".to_string(),
            opm: "1º BPM".to_string(),
            responsavel_atual: "Cartório".to_string(),
            recebimento: "10/03/2021 09:30:00".to_string(),
            observacao: "aguardando".to_string(),
        }]);
        let text = format_abertos(&listing);
        assert!(text.contains("Laudos - Tramitação"));
        assert!(text.contains("L-001/2020"));
        assert!(text.contains("10/03/2021 09:30:00"));
        assert!(text.contains("aguardando"));
    }

    #[test]
    fn abertos_empty_state_renders_the_notice() {
        let text = format_abertos(&OpenListing::Vazio);
        assert_eq!(text, format!("{AVISO_SEM_ABERTOS}\n"));
    }

    #[test]
    fn percentages_use_panel_totals() {
        let plan = PanelPlan {
            panels: vec![crate::panel::Panel {
                dimension: Dimension::Opm,
                encoding: Dimension::Opm.encoding(),
                data: PanelData::Categorias(vec![("A".to_string(), 1), ("B".to_string(), 1)]),
            }],
            skipped: Vec::new(),
        };
        let text = format_resumo_paineis(&plan, 2);
        assert!(text.contains("50.0%"));
    }
}
