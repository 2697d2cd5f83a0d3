use crate::error::{Error, Result};
use crate::model::{Cell, ResultSet};
use mysql::prelude::{Protocol, Queryable};
use mysql::{Conn, Opts, OptsBuilder, Params, QueryResult};
use std::time::Duration;
use tracing::{debug, info};

/// A connected SQL client the operations borrow for the length of a call.
pub trait Session {
    /// Runs one statement. `params` bind to `?` placeholders in order.
    fn query(&mut self, sql: &str, params: &[&str]) -> Result<ResultSet>;

    fn execute(&mut self, sql: &str) -> Result<()> {
        self.query(sql, &[]).map(|_| ())
    }
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn query(&mut self, sql: &str, params: &[&str]) -> Result<ResultSet> {
        (**self).query(sql, params)
    }
}

/// Turns an optional session handle into a usable one, or the typed "no session" error.
pub fn resolve_session<S: ?Sized>(session: Option<&mut S>) -> Result<&mut S> {
    session.ok_or(Error::SessionUnavailable)
}

/// Backtick-quotes an identifier for use in statement text.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `schema`.`object`, both parts quoted.
pub fn qualified(schema: &str, object: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(object))
}

pub struct MySqlSession {
    conn: Conn,
}

impl MySqlSession {
    pub fn connect(url: &str, connect_timeout: Duration) -> Result<Self> {
        let opts = OptsBuilder::from_opts(Opts::from_url(url)?)
            .tcp_connect_timeout(Some(connect_timeout));
        let conn = Conn::new(opts)?;
        info!(connection_id = conn.connection_id(), "connected");
        Ok(Self { conn })
    }

    pub fn from_conn(conn: Conn) -> Self {
        Self { conn }
    }

    fn collect<P: Protocol>(mut result: QueryResult<'_, '_, '_, P>) -> Result<ResultSet> {
        let columns = result
            .columns()
            .as_ref()
            .iter()
            .map(|c| c.name_str().into_owned())
            .collect();
        let mut rows = Vec::new();
        for row in result.by_ref() {
            let row = row?;
            rows.push(row.unwrap().into_iter().map(Cell::from).collect());
        }
        Ok(ResultSet::new(columns, rows))
    }
}

impl Session for MySqlSession {
    fn query(&mut self, sql: &str, params: &[&str]) -> Result<ResultSet> {
        debug!(sql, ?params, "executing statement");
        if params.is_empty() {
            let result = self.conn.query_iter(sql)?;
            Self::collect(result)
        } else {
            let params = Params::Positional(
                params.iter().map(|p| mysql::Value::from(*p)).collect(),
            );
            let result = self.conn.exec_iter(sql, params)?;
            Self::collect(result)
        }
    }
}
