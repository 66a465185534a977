//! Typed loading of the report dataset and the open-transit join.
//!
//! This module turns the executor's rectangular `Table` into domain rows with
//! row-level validation and clear error messages. No aggregation logic here.

use crate::data::executor::{QueryExecutor, Table};
use crate::domain::{Laudo, LinhaAberta};
use crate::error::AppError;

/// Full report dataset, as in the reference implementation.
pub const SQL_LAUDOS: &str = "SELECT id, numero_laudo, ano, opm, perito_relator, \
     marca_arma, modelo_arma, descricao_exame FROM laudos";

/// The reference open-transit query: join, filter to open records, sort by
/// intake time ascending (oldest-waiting first).
pub const SQL_ABERTOS: &str = "SELECT l.numero_laudo, l.ano, l.opm, \
            t.responsavel_atual, t.data_recebimento, t.observacao \
       FROM laudos l \
       JOIN tramitacoes t ON l.id = t.laudo_id \
      WHERE t.data_conclusao IS NULL \
      ORDER BY t.data_recebimento ASC";

/// Load all reports.
pub fn load_laudos(exec: &dyn QueryExecutor) -> Result<Vec<Laudo>, AppError> {
    let table = exec.query(SQL_LAUDOS)?;

    let idx_id = table.require_column("id")?;
    let idx_numero = table.require_column("numero_laudo")?;
    let idx_ano = table.require_column("ano")?;
    let idx_opm = table.require_column("opm")?;
    let idx_perito = table.require_column("perito_relator")?;
    let idx_marca = table.require_column("marca_arma")?;
    let idx_modelo = table.require_column("modelo_arma")?;
    let idx_exame = table.require_column("descricao_exame")?;

    let mut out = Vec::with_capacity(table.rows.len());
    for (line, row) in table.rows.iter().enumerate() {
        let id = row[idx_id]
            .as_i64()
            .ok_or_else(|| AppError::data(format!("laudos: linha {}: 'id' não é inteiro.", line + 1)))?;
        out.push(Laudo {
            id,
            numero_laudo: row[idx_numero].display(),
            ano: row[idx_ano].display(),
            opm: row[idx_opm].display(),
            perito_relator: row[idx_perito].display(),
            marca_arma: row[idx_marca].display(),
            modelo_arma: row[idx_modelo].display(),
            descricao_exame: row[idx_exame].display(),
        });
    }
    Ok(out)
}

/// Load the open-transit rows (join already filtered and sorted in SQL).
pub fn load_abertos(exec: &dyn QueryExecutor) -> Result<Vec<LinhaAberta>, AppError> {
    let table = exec.query(SQL_ABERTOS)?;
    linhas_abertas_from_table(&table)
}

fn linhas_abertas_from_table(table: &Table) -> Result<Vec<LinhaAberta>, AppError> {
    let idx_numero = table.require_column("numero_laudo")?;
    let idx_ano = table.require_column("ano")?;
    let idx_opm = table.require_column("opm")?;
    let idx_responsavel = table.require_column("responsavel_atual")?;
    let idx_recebimento = table.require_column("data_recebimento")?;
    let idx_observacao = table.require_column("observacao")?;

    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        out.push(LinhaAberta {
            numero_laudo: row[idx_numero].display(),
            ano: row[idx_ano].display(),
            opm: row[idx_opm].display(),
            responsavel_atual: row[idx_responsavel].display(),
            data_recebimento: row[idx_recebimento].display(),
            observacao: row[idx_observacao].display(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::executor::SqliteExecutor;
    use rusqlite::Connection;

    /// Seed the reference schema with two reports: one with an open transit
    /// record and one already concluded.
    fn seeded_executor() -> SqliteExecutor {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.execute_batch(
            "CREATE TABLE laudos (
                 id INTEGER PRIMARY KEY,
                 numero_laudo TEXT,
                 ano TEXT,
                 opm TEXT,
                 perito_relator TEXT,
                 marca_arma TEXT,
                 modelo_arma TEXT,
                 descricao_exame TEXT
             );
             CREATE TABLE tramitacoes (
                 id INTEGER PRIMARY KEY,
                 laudo_id INTEGER REFERENCES laudos(id),
                 responsavel_atual TEXT,
                 data_recebimento TEXT,
                 data_conclusao TEXT,
                 observacao TEXT
             );
             INSERT INTO laudos VALUES
                 (1, 'L-001/2020', '2020', '1º BPM', 'Silva', 'Taurus', 'PT92', 'Eficiência'),
                 (2, 'L-002/2021', '2021', '2º BPM', 'Souza', 'Glock', 'G17', 'Confronto');
             INSERT INTO tramitacoes VALUES
                 (1, 1, 'Cartório', '2021-03-10 09:30:00', NULL, 'aguardando assinatura'),
                 (2, 2, 'Arquivo', '2021-01-05 14:00:00', '2021-02-01 10:00:00', '');",
        )
        .expect("seed");
        SqliteExecutor::from_connection(conn)
    }

    #[test]
    fn load_laudos_maps_all_columns() {
        let exec = seeded_executor();
        let laudos = load_laudos(&exec).unwrap();
        assert_eq!(laudos.len(), 2);
        assert_eq!(laudos[0].numero_laudo, "L-001/2020");
        assert_eq!(laudos[0].ano, "2020");
        assert_eq!(laudos[1].opm, "2º BPM");
        assert_eq!(laudos[1].descricao_exame, "Confronto");
    }

    #[test]
    fn load_abertos_filters_to_open_records_only() {
        let exec = seeded_executor();
        let abertos = load_abertos(&exec).unwrap();
        // Report 2's transit is concluded; only report 1's open record remains.
        assert_eq!(abertos.len(), 1);
        assert_eq!(abertos[0].numero_laudo, "L-001/2020");
        assert_eq!(abertos[0].responsavel_atual, "Cartório");
        assert_eq!(abertos[0].observacao, "aguardando assinatura");
    }

    #[test]
    fn load_abertos_sorts_by_intake_ascending_in_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE laudos (id INTEGER PRIMARY KEY, numero_laudo TEXT, ano TEXT, opm TEXT,
                 perito_relator TEXT, marca_arma TEXT, modelo_arma TEXT, descricao_exame TEXT);
             CREATE TABLE tramitacoes (id INTEGER PRIMARY KEY, laudo_id INTEGER,
                 responsavel_atual TEXT, data_recebimento TEXT, data_conclusao TEXT, observacao TEXT);
             INSERT INTO laudos VALUES (1, 'L-1', '2020', 'A', 'p', 'm', 'm', 'e');
             INSERT INTO laudos VALUES (2, 'L-2', '2020', 'B', 'p', 'm', 'm', 'e');
             INSERT INTO tramitacoes VALUES (1, 1, 'X', '2022-05-01 08:00:00', NULL, '');
             INSERT INTO tramitacoes VALUES (2, 2, 'Y', '2020-01-01 08:00:00', NULL, '');",
        )
        .unwrap();
        let exec = SqliteExecutor::from_connection(conn);
        let abertos = load_abertos(&exec).unwrap();
        assert_eq!(abertos.len(), 2);
        assert_eq!(abertos[0].numero_laudo, "L-2");
        assert_eq!(abertos[1].numero_laudo, "L-1");
    }

    #[test]
    fn multiple_open_transits_for_one_report_stay_separate_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE laudos (id INTEGER PRIMARY KEY, numero_laudo TEXT, ano TEXT, opm TEXT,
                 perito_relator TEXT, marca_arma TEXT, modelo_arma TEXT, descricao_exame TEXT);
             CREATE TABLE tramitacoes (id INTEGER PRIMARY KEY, laudo_id INTEGER,
                 responsavel_atual TEXT, data_recebimento TEXT, data_conclusao TEXT, observacao TEXT);
             INSERT INTO laudos VALUES (1, 'L-1', '2020', 'A', 'p', 'm', 'm', 'e');
             INSERT INTO tramitacoes VALUES (1, 1, 'X', '2021-01-01 08:00:00', NULL, 'primeira'),
                                            (2, 1, 'Y', '2021-02-01 08:00:00', NULL, 'segunda');",
        )
        .unwrap();
        let exec = SqliteExecutor::from_connection(conn);
        let abertos = load_abertos(&exec).unwrap();
        assert_eq!(abertos.len(), 2);
    }
}
