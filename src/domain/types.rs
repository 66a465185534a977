//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported to JSON
//! - rendered by either the terminal UI or the plain-text reports

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One ballistics examination report (a row of the `laudos` table).
///
/// `ano` stays a raw string here: coercion to an integer year happens in the
/// aggregator so a bad value surfaces as a data-quality notice for the whole
/// panel batch instead of a load failure.
#[derive(Debug, Clone)]
pub struct Laudo {
    pub id: i64,
    pub numero_laudo: String,
    pub ano: String,
    pub opm: String,
    pub perito_relator: String,
    pub marca_arma: String,
    pub modelo_arma: String,
    pub descricao_exame: String,
}

/// One open processing record after the `laudos ⋈ tramitacoes` join.
///
/// `data_recebimento` is kept raw; the open-transit pipeline parses and
/// reformats it (and keeps the row with a marker when parsing fails).
#[derive(Debug, Clone)]
pub struct LinhaAberta {
    pub numero_laudo: String,
    pub ano: String,
    pub opm: String,
    pub responsavel_atual: String,
    pub data_recebimento: String,
    pub observacao: String,
}

/// A column of the report dataset chosen for aggregation.
///
/// The order of `Dimension::TODAS` is the reference panel catalog order; the
/// catalog itself is reorderable via `--panels`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Opm,
    Ano,
    #[value(name = "perito")]
    PeritoRelator,
    #[value(name = "marca")]
    MarcaArma,
    #[value(name = "modelo")]
    ModeloArma,
    #[value(name = "exame")]
    DescricaoExame,
}

impl Dimension {
    /// Reference catalog order: OPM → Ano → Perito → Marca → Modelo → Exame.
    pub const TODAS: [Dimension; 6] = [
        Dimension::Opm,
        Dimension::Ano,
        Dimension::PeritoRelator,
        Dimension::MarcaArma,
        Dimension::ModeloArma,
        Dimension::DescricaoExame,
    ];

    /// Column name in the `laudos` table.
    pub fn coluna(self) -> &'static str {
        match self {
            Dimension::Opm => "opm",
            Dimension::Ano => "ano",
            Dimension::PeritoRelator => "perito_relator",
            Dimension::MarcaArma => "marca_arma",
            Dimension::ModeloArma => "modelo_arma",
            Dimension::DescricaoExame => "descricao_exame",
        }
    }

    /// Panel title. Titles travel with the dimension, not the slot.
    pub fn titulo(self) -> &'static str {
        match self {
            Dimension::Opm => "Laudos por OPM",
            Dimension::Ano => "Laudos por Ano",
            Dimension::PeritoRelator => "Laudos por Perito",
            Dimension::MarcaArma => "Laudos por Marca",
            Dimension::ModeloArma => "Laudos por Modelo",
            Dimension::DescricaoExame => "Laudos por Exame",
        }
    }

    /// Short axis label for the category axis.
    pub fn rotulo_eixo(self) -> &'static str {
        match self {
            Dimension::Opm => "OPM",
            Dimension::Ano => "Ano",
            Dimension::PeritoRelator => "Perito",
            Dimension::MarcaArma => "Marca",
            Dimension::ModeloArma => "Modelo",
            Dimension::DescricaoExame => "Exame",
        }
    }

    /// Visual encoding bound to this dimension.
    pub fn encoding(self) -> Encoding {
        match self {
            Dimension::Opm => Encoding::Pizza,
            Dimension::Ano => Encoding::Linha,
            Dimension::PeritoRelator => Encoding::BarrasH,
            Dimension::MarcaArma => Encoding::BarrasV,
            Dimension::ModeloArma => Encoding::BarrasH,
            Dimension::DescricaoExame => Encoding::Rosca,
        }
    }

    /// The raw value of this dimension for one report row.
    pub fn valor(self, laudo: &Laudo) -> &str {
        match self {
            Dimension::Opm => &laudo.opm,
            Dimension::Ano => &laudo.ano,
            Dimension::PeritoRelator => &laudo.perito_relator,
            Dimension::MarcaArma => &laudo.marca_arma,
            Dimension::ModeloArma => &laudo.modelo_arma,
            Dimension::DescricaoExame => &laudo.descricao_exame,
        }
    }
}

/// Visual encoding of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Proportion-of-whole, few categories.
    Pizza,
    /// Pie with a hollow centre.
    Rosca,
    /// Ordered time series with point markers.
    Linha,
    /// Horizontal bars, category names on the label axis, sorted by count.
    BarrasH,
    /// Vertical count bars with abbreviated tick labels.
    BarrasV,
}

impl Encoding {
    pub fn display_name(self) -> &'static str {
        match self {
            Encoding::Pizza => "pizza",
            Encoding::Rosca => "rosca",
            Encoding::Linha => "linha",
            Encoding::BarrasH => "barras-h",
            Encoding::BarrasV => "barras-v",
        }
    }
}

/// Policy for non-numeric values in the `ano` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum YearPolicy {
    /// A single bad row invalidates the whole panel batch (default).
    #[value(name = "abort")]
    AbortAll,
    /// Skip the failing panel and keep the rest.
    #[value(name = "partial")]
    Partial,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Panel catalog: the first N ≤ 6 dimensions fill the first N grid slots.
    pub catalog: Vec<Dimension>,
    pub year_policy: YearPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            catalog: Dimension::TODAS.to_vec(),
            year_policy: YearPolicy::AbortAll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_catalog_order_and_encodings() {
        let catalog = Dimension::TODAS;
        assert_eq!(catalog[0], Dimension::Opm);
        assert_eq!(catalog[1], Dimension::Ano);
        assert_eq!(catalog[5], Dimension::DescricaoExame);

        assert_eq!(Dimension::Opm.encoding(), Encoding::Pizza);
        assert_eq!(Dimension::Ano.encoding(), Encoding::Linha);
        assert_eq!(Dimension::PeritoRelator.encoding(), Encoding::BarrasH);
        assert_eq!(Dimension::MarcaArma.encoding(), Encoding::BarrasV);
        assert_eq!(Dimension::ModeloArma.encoding(), Encoding::BarrasH);
        assert_eq!(Dimension::DescricaoExame.encoding(), Encoding::Rosca);
    }

    #[test]
    fn titles_are_bound_to_dimensions() {
        assert_eq!(Dimension::Opm.titulo(), "Laudos por OPM");
        assert_eq!(Dimension::Ano.titulo(), "Laudos por Ano");
        assert_eq!(Dimension::DescricaoExame.titulo(), "Laudos por Exame");
    }
}
