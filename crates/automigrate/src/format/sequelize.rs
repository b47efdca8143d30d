//! Sequelize migration format.
//!
//! Generates CommonJS migration modules for the `sequelize-cli` runner:
//! `up` creates the table and its indexes, `down` drops the table.

use crate::operations::MigrationOperation;
use crate::schema::{ColumnDefinition, DefaultValue, MigrationDescriptor};
use crate::typemap::{unquote_sql_string, TypeExpression};

use super::MigrationFormat;

/// Indentation of statements inside `Promise.all([...])`.
const STATEMENT_INDENT: &str = "      ";

/// Sequelize migration format.
#[derive(Debug, Clone, Default)]
pub struct SequelizeFormat;

impl SequelizeFormat {
    /// Creates a new Sequelize format.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generates the `createTable` call.
    fn create_table_js(&self, name: &str, columns: &[ColumnDefinition]) -> String {
        let mut js = format!("queryInterface.createTable({}, {{\n", js_string(name));
        for column in columns {
            js.push_str(&self.column_js(column));
        }
        js.push_str(STATEMENT_INDENT);
        js.push_str("})");
        js
    }

    /// Generates one column entry of a `createTable` attribute object.
    fn column_js(&self, column: &ColumnDefinition) -> String {
        let mut js = format!("        {}: {{\n", js_key(&column.name));
        js.push_str(&format!(
            "          type: {},\n",
            self.type_expression(&column.sql_type)
        ));
        js.push_str(&format!("          allowNull: {},\n", column.allow_null));
        if let Some(ref default) = column.default {
            js.push_str(&format!("          defaultValue: {},\n", default_js(default)));
        }
        if column.primary_key {
            js.push_str("          primaryKey: true,\n");
        }
        if column.auto_increment {
            js.push_str("          autoIncrement: true,\n");
        }
        if let Some(ref comment) = column.comment {
            js.push_str(&format!("          comment: {},\n", js_string(comment)));
        }
        js.push_str("        },\n");
        js
    }

    /// Generates the `addIndex` call.
    fn add_index_js(&self, table: &str, name: &str, columns: &[String], unique: bool) -> String {
        let quoted: Vec<String> = columns.iter().map(|c| js_string(c)).collect();
        let mut js = String::from("queryInterface.addIndex(\n");
        js.push_str(&format!("        {},\n", js_string(table)));
        js.push_str(&format!("        [{}],\n", quoted.join(",")));
        js.push_str("        {\n");
        js.push_str(&format!("          name: {},\n", js_string(name)));
        if unique {
            js.push_str("          unique: true,\n");
        }
        js.push_str("        }\n");
        js.push_str(STATEMENT_INDENT);
        js.push(')');
        js
    }
}

impl MigrationFormat for SequelizeFormat {
    fn name(&self) -> &'static str {
        "sequelize"
    }

    fn file_extension(&self) -> &'static str {
        "js"
    }

    fn type_expression(&self, sql_type: &TypeExpression) -> String {
        let TypeExpression::Literal(raw) = sql_type else {
            let mut js = format!("Sequelize.{}", sql_type.name().unwrap_or_default());
            if !sql_type.args().is_empty() {
                let args: Vec<String> = sql_type.args().iter().map(|a| arg_js(a)).collect();
                js.push_str(&format!("({})", args.join(",")));
            }
            for flag in sql_type.flags() {
                js.push('.');
                js.push_str(flag.keyword());
            }
            return js;
        };
        js_string(raw)
    }

    fn render_operation(&self, operation: &MigrationOperation) -> String {
        match operation {
            MigrationOperation::CreateTable { name, columns } => {
                self.create_table_js(name, columns)
            }
            MigrationOperation::DropTable { name } => {
                format!("queryInterface.dropTable({})", js_string(name))
            }
            MigrationOperation::AddIndex {
                table,
                name,
                columns,
                unique,
            } => self.add_index_js(table, name, columns, *unique),
        }
    }

    fn render(&self, descriptor: &MigrationDescriptor) -> String {
        let mut js = String::from("'use strict';\n");
        js.push_str("module.exports = {\n");

        js.push_str("  up: async (queryInterface, Sequelize) => {\n");
        js.push_str("    return Promise.all([\n");
        for operation in descriptor.up_operations() {
            js.push_str(STATEMENT_INDENT);
            js.push_str("await ");
            js.push_str(&self.render_operation(&operation));
            js.push_str(",\n");
        }
        js.push_str("    ]);\n");
        js.push_str("  },\n");

        js.push_str("  down: (queryInterface, Sequelize) => {\n");
        js.push_str("    return Promise.all([\n");
        let down: Vec<String> = descriptor
            .down_operations()
            .iter()
            .map(|op| format!("{}{}", STATEMENT_INDENT, self.render_operation(op)))
            .collect();
        js.push_str(&down.join(",\n"));
        js.push('\n');
        js.push_str("    ]);\n");
        js.push_str("  }\n");

        js.push_str("};\n");
        js
    }
}

/// Renders a default value: expressions through `Sequelize.literal`, plain
/// values as strings.
fn default_js(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Literal(value) => js_string(value),
        DefaultValue::Expression(expr) => format!("Sequelize.literal({})", js_string(expr)),
    }
}

/// Renders a type argument. Quoted SQL values are re-quoted for JavaScript.
fn arg_js(arg: &str) -> String {
    if arg.len() >= 2 && arg.starts_with('\'') && arg.ends_with('\'') {
        js_string(&unquote_sql_string(&arg[1..arg.len() - 1]))
    } else {
        arg.to_string()
    }
}

/// Quotes a value as a single-quoted JavaScript string literal.
fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Renders an object key, quoting names that are not plain identifiers.
fn js_key(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        name.to_string()
    } else {
        js_string(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IndexDescriptor;
    use crate::typemap::{map_native_type, TypeFlag};

    fn type_js(native: &str) -> String {
        SequelizeFormat::new().type_expression(&map_native_type(native).unwrap())
    }

    #[test]
    fn test_type_expressions() {
        assert_eq!(
            type_js("INT(11) UNSIGNED ZEROFILL"),
            "Sequelize.INTEGER(11).UNSIGNED.ZEROFILL"
        );
        assert_eq!(type_js("VARCHAR(255)"), "Sequelize.STRING(255)");
        assert_eq!(type_js("VARCHAR BINARY"), "Sequelize.STRING.BINARY");
        assert_eq!(type_js("CHAR(10) BINARY"), "Sequelize.CHAR(10).BINARY");
        assert_eq!(type_js("TINYINT(1)"), "Sequelize.BOOLEAN");
        assert_eq!(type_js("DECIMAL(10,2)"), "Sequelize.DECIMAL(10,2)");
        assert_eq!(type_js("LONGTEXT"), "Sequelize.TEXT('long')");
        assert_eq!(type_js("TINYBLOB"), "Sequelize.BLOB('tiny')");
        assert_eq!(type_js("ENUM('a','b')"), "Sequelize.ENUM('a','b')");
        assert_eq!(type_js("DATETIME(3)"), "Sequelize.DATE(3)");
        assert_eq!(type_js("DATE"), "Sequelize.DATEONLY");
        assert_eq!(type_js("YEAR(4)"), "'YEAR(4)'");
        assert_eq!(type_js("TIMESTAMP"), "'TIMESTAMP'");
    }

    #[test]
    fn test_enum_values_become_js_strings() {
        assert_eq!(
            type_js("enum('it''s','b')"),
            "Sequelize.ENUM('it\\'s','b')"
        );
        assert_eq!(
            type_js(r"ENUM('C:\\dir','a,b')"),
            r"Sequelize.ENUM('C:\\dir','a,b')"
        );
        assert_eq!(type_js("MEDIUMTEXT"), "Sequelize.TEXT('medium')");
    }

    #[test]
    fn test_js_string_escaping() {
        assert_eq!(js_string("plain"), "'plain'");
        assert_eq!(js_string("it's"), "'it\\'s'");
        assert_eq!(js_string("a\\b\nc"), "'a\\\\b\\nc'");
    }

    #[test]
    fn test_js_key() {
        assert_eq!(js_key("user_id"), "user_id");
        assert_eq!(js_key("$ref"), "$ref");
        assert_eq!(js_key("first-name"), "'first-name'");
        assert_eq!(js_key("2fa"), "'2fa'");
    }

    #[test]
    fn test_render_operations() {
        let format = SequelizeFormat::new();
        assert_eq!(
            format.render_operation(&MigrationOperation::drop_table("users")),
            "queryInterface.dropTable('users')"
        );
    }

    #[test]
    fn test_render_full_file() {
        let descriptor = MigrationDescriptor {
            table_name: "users".to_string(),
            columns: vec![
                ColumnDefinition {
                    name: "id".to_string(),
                    sql_type: TypeExpression::sized("INTEGER", "11")
                        .with_flags(vec![TypeFlag::Unsigned]),
                    allow_null: false,
                    default: None,
                    primary_key: true,
                    auto_increment: true,
                    comment: None,
                },
                ColumnDefinition {
                    name: "status".to_string(),
                    sql_type: TypeExpression::sized("STRING", "16"),
                    allow_null: true,
                    default: Some(DefaultValue::Literal("draft".to_string())),
                    primary_key: false,
                    auto_increment: false,
                    comment: Some("workflow state".to_string()),
                },
                ColumnDefinition {
                    name: "created_at".to_string(),
                    sql_type: TypeExpression::symbolic("DATE"),
                    allow_null: false,
                    default: Some(DefaultValue::Expression("CURRENT_TIMESTAMP".to_string())),
                    primary_key: false,
                    auto_increment: false,
                    comment: None,
                },
            ],
            indexes: vec![
                IndexDescriptor {
                    name: "idx_status_created".to_string(),
                    columns: vec!["status".to_string(), "created_at".to_string()],
                    unique: false,
                },
                IndexDescriptor {
                    name: "uniq_status".to_string(),
                    columns: vec!["status".to_string()],
                    unique: true,
                },
            ],
        };

        let expected = "\
'use strict';
module.exports = {
  up: async (queryInterface, Sequelize) => {
    return Promise.all([
      await queryInterface.createTable('users', {
        id: {
          type: Sequelize.INTEGER(11).UNSIGNED,
          allowNull: false,
          primaryKey: true,
          autoIncrement: true,
        },
        status: {
          type: Sequelize.STRING(16),
          allowNull: true,
          defaultValue: 'draft',
          comment: 'workflow state',
        },
        created_at: {
          type: Sequelize.DATE,
          allowNull: false,
          defaultValue: Sequelize.literal('CURRENT_TIMESTAMP'),
        },
      }),
      await queryInterface.addIndex(
        'users',
        ['status','created_at'],
        {
          name: 'idx_status_created',
        }
      ),
      await queryInterface.addIndex(
        'users',
        ['status'],
        {
          name: 'uniq_status',
          unique: true,
        }
      ),
    ]);
  },
  down: (queryInterface, Sequelize) => {
    return Promise.all([
      queryInterface.dropTable('users')
    ]);
  }
};
";

        assert_eq!(SequelizeFormat::new().render(&descriptor), expected);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(SequelizeFormat::new().file_name("users"), "users.js");
    }
}
