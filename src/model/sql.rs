use std::fmt;

/// A positional argument bound to a `?` placeholder in a [`SqlBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlArg {
    Int(i64),
    Text(String),
}

impl SqlArg {
    /// Text form handed to the driver when binding.
    pub fn as_text(&self) -> String {
        match self {
            SqlArg::Int(value) => value.to_string(),
            SqlArg::Text(value) => value.clone(),
        }
    }
}

/// SQL text together with the arguments for its placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlBuilder {
    sql: String,
    args: Vec<SqlArg>,
}

impl SqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sql(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            args: Vec::new(),
        }
    }

    /// Append raw SQL text.
    pub fn sql(mut self, fragment: &str) -> Self {
        self.sql.push_str(fragment);
        self
    }

    /// Append an argument for the next placeholder.
    pub fn arg(mut self, arg: SqlArg) -> Self {
        self.args.push(arg);
        self
    }

    /// Append all text and arguments of another builder.
    pub fn append(mut self, other: &SqlBuilder) -> Self {
        self.sql.push_str(&other.sql);
        self.args.extend(other.args.iter().cloned());
        self
    }

    pub fn sql_string(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[SqlArg] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.sql.trim().is_empty()
    }
}

impl fmt::Display for SqlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One `ORDER BY` term. `name` is used verbatim, so callers quote it when needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub name: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Desc,
        }
    }

    /// Parse `column`, `column:asc` or `column:desc`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (name, direction) = match spec.rsplit_once(':') {
            Some((name, dir)) => match dir.to_ascii_lowercase().as_str() {
                "asc" => (name, Direction::Asc),
                "desc" => (name, Direction::Desc),
                _ => return None,
            },
            None => (spec, Direction::Asc),
        };

        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            direction,
        })
    }
}

/// A catalog table, qualified by its schema when the catalog reports one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    pub schema: Option<String>,
    pub name: String,
}

impl TableName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

impl From<&str> for TableName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TableName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A table and one of its columns, known to exist when sampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSample {
    pub table: TableName,
    pub column_name: String,
}

impl ProbeSample {
    pub fn new(table: impl Into<TableName>, column_name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column_name: column_name.into(),
        }
    }
}
