//! Open-transit pipeline: sort, reformat, and classify the joined rows.
//!
//! The join and the open filter run in SQL (see `data::laudos::SQL_ABERTOS`);
//! this module guarantees the sort order in-memory, reformats the intake
//! timestamp for display, and distinguishes "nothing open" from "no data".

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::LinhaAberta;

/// Marker for intake timestamps that fail to parse. The row is kept.
pub const MARCADOR_DATA_INVALIDA: &str = "(data inválida)";

/// User-visible notice for the all-clear state.
pub const AVISO_SEM_ABERTOS: &str = "Nenhum laudo com tramitação em aberto encontrado.";

/// Display pattern for the intake timestamp.
const FORMATO_RECEBIMENTO: &str = "%d/%m/%Y %H:%M:%S";

/// One formatted row of the open-items table.
#[derive(Debug, Clone, PartialEq)]
pub struct LinhaFormatada {
    pub numero_laudo: String,
    pub ano: String,
    pub opm: String,
    pub responsavel_atual: String,
    /// Intake timestamp in `dd/mm/yyyy hh:mm:ss`, or the unparseable marker.
    pub recebimento: String,
    pub observacao: String,
}

/// The open-items artifact. `Vazio` is a distinct, explicitly signaled state:
/// the caller can tell "all clear" apart from "no data at all".
#[derive(Debug, Clone, PartialEq)]
pub enum OpenListing {
    Vazio,
    Abertos(Vec<LinhaFormatada>),
}

impl OpenListing {
    pub fn len(&self) -> usize {
        match self {
            OpenListing::Vazio => 0,
            OpenListing::Abertos(linhas) => linhas.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, OpenListing::Vazio)
    }
}

/// Build the listing: oldest-open-first, unparseable intake timestamps last
/// (stable order among themselves), each row reformatted for display.
pub fn montar_listagem(mut linhas: Vec<LinhaAberta>) -> OpenListing {
    if linhas.is_empty() {
        return OpenListing::Vazio;
    }

    linhas.sort_by_key(|linha| {
        let parsed = parse_recebimento(&linha.data_recebimento);
        (parsed.is_none(), parsed)
    });

    let formatadas = linhas
        .into_iter()
        .map(|linha| {
            let recebimento = match parse_recebimento(&linha.data_recebimento) {
                Some(ts) => ts.format(FORMATO_RECEBIMENTO).to_string(),
                None => MARCADOR_DATA_INVALIDA.to_string(),
            };
            LinhaFormatada {
                numero_laudo: linha.numero_laudo,
                ano: linha.ano,
                opm: linha.opm,
                responsavel_atual: linha.responsavel_atual,
                recebimento,
                observacao: linha.observacao,
            }
        })
        .collect();

    OpenListing::Abertos(formatadas)
}

/// Parse the stored intake timestamp.
///
/// Accepts the formats the source database is known to emit: ISO date-time
/// with or without fractional seconds or a `T` separator, and a bare date
/// (interpreted as midnight).
fn parse_recebimento(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linha(numero: &str, recebimento: &str) -> LinhaAberta {
        LinhaAberta {
            numero_laudo: numero.to_string(),
            ano: "2021".to_string(),
            opm: "1º BPM".to_string(),
            responsavel_atual: "Cartório".to_string(),
            data_recebimento: recebimento.to_string(),
            observacao: String::new(),
        }
    }

    #[test]
    fn empty_input_is_the_distinct_all_clear_state() {
        assert_eq!(montar_listagem(Vec::new()), OpenListing::Vazio);
    }

    #[test]
    fn rows_are_sorted_oldest_intake_first() {
        let listing = montar_listagem(vec![
            linha("L-3", "2022-01-01 10:00:00"),
            linha("L-1", "2020-06-15 08:30:00"),
            linha("L-2", "2021-12-31 23:59:59"),
        ]);
        let OpenListing::Abertos(linhas) = listing else {
            panic!("expected rows");
        };
        let ordem: Vec<&str> = linhas.iter().map(|l| l.numero_laudo.as_str()).collect();
        assert_eq!(ordem, vec!["L-1", "L-2", "L-3"]);
    }

    #[test]
    fn intake_timestamp_is_reformatted_for_display() {
        let listing = montar_listagem(vec![linha("L-1", "2021-03-10 09:30:00")]);
        let OpenListing::Abertos(linhas) = listing else {
            panic!("expected rows");
        };
        assert_eq!(linhas[0].recebimento, "10/03/2021 09:30:00");
    }

    #[test]
    fn bare_dates_and_t_separators_parse() {
        let listing = montar_listagem(vec![
            linha("L-1", "2021-03-10"),
            linha("L-2", "2021-03-10T12:00:00"),
            linha("L-3", "2021-03-10 12:00:00.500"),
        ]);
        let OpenListing::Abertos(linhas) = listing else {
            panic!("expected rows");
        };
        assert_eq!(linhas[0].recebimento, "10/03/2021 00:00:00");
        assert_eq!(linhas[1].recebimento, "10/03/2021 12:00:00");
        assert_eq!(linhas[2].recebimento, "10/03/2021 12:00:00");
    }

    #[test]
    fn unparseable_timestamps_are_marked_and_kept_last() {
        let listing = montar_listagem(vec![
            linha("L-1", "quando chegar"),
            linha("L-2", "2021-01-01 08:00:00"),
        ]);
        let OpenListing::Abertos(linhas) = listing else {
            panic!("expected rows");
        };
        assert_eq!(linhas.len(), 2);
        assert_eq!(linhas[0].numero_laudo, "L-2");
        assert_eq!(linhas[1].numero_laudo, "L-1");
        assert_eq!(linhas[1].recebimento, MARCADOR_DATA_INVALIDA);
    }

    #[test]
    fn unparseable_rows_keep_their_relative_order() {
        let listing = montar_listagem(vec![
            linha("L-1", "???"),
            linha("L-2", "xxx"),
        ]);
        let OpenListing::Abertos(linhas) = listing else {
            panic!("expected rows");
        };
        assert_eq!(linhas[0].numero_laudo, "L-1");
        assert_eq!(linhas[1].numero_laudo, "L-2");
    }
}
