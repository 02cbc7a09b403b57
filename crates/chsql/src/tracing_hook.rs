use crate::config::EventHandler;
use tracing::Level;

/// A `tracing`-based debug hook that emits the SQL that will actually be
/// executed.
///
/// Intended for the `BeforeExecute` event, where the context's `sql` already
/// holds the formatted statement while `sql_text` still holds the template.
///
/// Enable via the crate feature: `chsql = { features = ["tracing"] }`.
///
/// ```ignore
/// client.subscribe_arc(EventKind::BeforeExecute, TracingSqlHook::new().into_handler());
/// ```
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TracingSqlHook {
    /// Create a new hook with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    /// Convert this hook into an event handler.
    pub fn into_handler(self) -> EventHandler {
        std::sync::Arc::new(move |ctx| {
            /// Dispatch a tracing event at a runtime-determined level.
            macro_rules! emit_at_level {
                ($level:expr, $($field:tt)*) => {
                    match $level {
                        Level::ERROR => tracing::error!($($field)*),
                        Level::WARN  => tracing::warn!($($field)*),
                        Level::INFO  => tracing::info!($($field)*),
                        Level::DEBUG => tracing::debug!($($field)*),
                        Level::TRACE => tracing::trace!($($field)*),
                    }
                };
            }

            let sql = self.truncate_sql(&ctx.sql);
            let template = (ctx.sql != ctx.sql_text).then(|| self.truncate_sql(&ctx.sql_text));
            match template {
                Some(template) => emit_at_level!(
                    self.level,
                    target: "chsql.sql",
                    arg_count = ctx.sql_data.len(),
                    sql = %sql,
                    template = %template,
                ),
                None => emit_at_level!(
                    self.level,
                    target: "chsql.sql",
                    arg_count = ctx.sql_data.len(),
                    sql = %sql,
                ),
            }
        })
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
