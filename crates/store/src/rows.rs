//! Native wire rows for the six remote tables and their model mapping.
//!
//! The hosted service's column names are its own (`nome`, `saldo`,
//! `valor`, …) and differ from the internal model's attribute names. This
//! module is the single place that knows both vocabularies; nothing else
//! in the workspace spells a native column name.
//!
//! | table        | row type        | maps to       |
//! |--------------|-----------------|---------------|
//! | `contas`     | [`ContaRow`]    | `Account`     |
//! | `categorias` | [`CategoriaRow`]| `Category`    |
//! | `receitas`   | [`MovimentoRow`]| `Transaction` (income)  |
//! | `despesas`   | [`MovimentoRow`]| `Transaction` (expense) |
//! | `metas`      | [`MetaRow`]     | `Goal`        |
//! | `orcamentos` | [`OrcamentoRow`]| `Budget`      |

use chrono::{DateTime, NaiveDate, Utc};
use model::{
    Account, AccountKind, Budget, BudgetPeriod, Category, Goal, Polarity, Recurrence, Transaction,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ResultStore;

pub const TABLE_ACCOUNTS: &str = "contas";
pub const TABLE_CATEGORIES: &str = "categorias";
pub const TABLE_INCOMES: &str = "receitas";
pub const TABLE_EXPENSES: &str = "despesas";
pub const TABLE_GOALS: &str = "metas";
pub const TABLE_BUDGETS: &str = "orcamentos";

/// The movement table a given polarity lives in.
#[must_use]
pub const fn movement_table(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Income => TABLE_INCOMES,
        Polarity::Expense => TABLE_EXPENSES,
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A row of `contas`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContaRow {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub nome: String,
    pub tipo: String,
    pub saldo: f64,
    pub cor: String,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

impl ContaRow {
    /// `saldo` is the stored seed, so the derived balance starts equal to
    /// it; the finance container folds the ledger on top after every load.
    pub fn into_account(self) -> ResultStore<Account> {
        let initial = model::Money::from_decimal(self.saldo);
        Ok(Account {
            id: self.id,
            name: self.nome,
            kind: AccountKind::try_from(self.tipo.as_str())?,
            initial_balance: initial,
            balance: initial,
            color: self.cor,
            active: self.ativo,
            created_at: self.criado_em,
            updated_at: self.atualizado_em,
        })
    }

    pub fn from_account(user_id: Uuid, account: &Account) -> Self {
        Self {
            id: account.id,
            usuario_id: user_id,
            nome: account.name.clone(),
            tipo: account.kind.code().to_string(),
            saldo: account.initial_balance.to_decimal(),
            cor: account.color.clone(),
            ativo: account.active,
            criado_em: account.created_at,
            atualizado_em: account.updated_at,
        }
    }
}

/// A row of `categorias`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoriaRow {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub nome: String,
    pub tipo: String,
    pub icone: String,
    pub cor: String,
    pub ativo: bool,
}

impl CategoriaRow {
    pub fn into_category(self) -> ResultStore<Category> {
        Ok(Category {
            id: self.id,
            name: self.nome,
            polarity: Polarity::try_from(self.tipo.as_str())?,
            icon: self.icone,
            color: self.cor,
            active: self.ativo,
        })
    }

    pub fn from_category(user_id: Uuid, category: &Category) -> Self {
        Self {
            id: category.id,
            usuario_id: user_id,
            nome: category.name.clone(),
            tipo: category.polarity.code().to_string(),
            icone: category.icon.clone(),
            cor: category.color.clone(),
            ativo: category.active,
        }
    }
}

/// A row of `receitas` or `despesas`. Both movement tables share one
/// column set; the table itself carries the polarity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MovimentoRow {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub valor: f64,
    pub descricao: String,
    pub categoria_id: Option<Uuid>,
    pub conta_id: Uuid,
    pub data: Option<String>,
    pub recorrencia: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

impl MovimentoRow {
    /// A missing or unparseable `data` maps to `None` rather than an
    /// error: the entry stays in the ledger and only drops out of
    /// date-scoped aggregates.
    pub fn into_transaction(self, polarity: Polarity) -> ResultStore<Transaction> {
        let recurrence = match self.recorrencia.as_deref() {
            None => Recurrence::None,
            Some(code) => Recurrence::try_from(code)?,
        };
        Ok(Transaction {
            id: self.id,
            polarity,
            amount: model::Money::from_decimal(self.valor),
            description: self.descricao,
            category_id: self.categoria_id,
            account_id: self.conta_id,
            date: self
                .data
                .as_deref()
                .and_then(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()),
            recurrence,
            created_at: self.criado_em,
            updated_at: self.atualizado_em,
        })
    }

    pub fn from_transaction(user_id: Uuid, tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            usuario_id: user_id,
            valor: tx.amount.to_decimal(),
            descricao: tx.description.clone(),
            categoria_id: tx.category_id,
            conta_id: tx.account_id,
            data: tx.date.map(|d| d.format(DATE_FORMAT).to_string()),
            recorrencia: Some(tx.recurrence.code().to_string()),
            criado_em: tx.created_at,
            atualizado_em: tx.updated_at,
        }
    }
}

/// A row of `metas`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetaRow {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub nome: String,
    pub valor_alvo: f64,
    pub valor_atual: f64,
    pub data_alvo: Option<NaiveDate>,
    pub descricao: Option<String>,
    pub criado_em: DateTime<Utc>,
}

impl MetaRow {
    pub fn into_goal(self) -> ResultStore<Goal> {
        Ok(Goal {
            id: self.id,
            name: self.nome,
            target: model::Money::from_decimal(self.valor_alvo),
            saved: model::Money::from_decimal(self.valor_atual),
            target_date: self.data_alvo,
            note: self.descricao,
            created_at: self.criado_em,
        })
    }

    pub fn from_goal(user_id: Uuid, goal: &Goal) -> Self {
        Self {
            id: goal.id,
            usuario_id: user_id,
            nome: goal.name.clone(),
            valor_alvo: goal.target.to_decimal(),
            valor_atual: goal.saved.to_decimal(),
            data_alvo: goal.target_date,
            descricao: goal.note.clone(),
            criado_em: goal.created_at,
        }
    }
}

/// A row of `orcamentos`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrcamentoRow {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub categoria_id: Uuid,
    pub valor: f64,
    pub periodo: String,
    pub gasto: f64,
    pub limite_alerta: f64,
    pub criado_em: DateTime<Utc>,
}

impl OrcamentoRow {
    pub fn into_budget(self) -> ResultStore<Budget> {
        Ok(Budget {
            id: self.id,
            category_id: self.categoria_id,
            amount: model::Money::from_decimal(self.valor),
            period: BudgetPeriod::try_from(self.periodo.as_str())?,
            spent_hint: model::Money::from_decimal(self.gasto),
            alert_threshold: self.limite_alerta,
            created_at: self.criado_em,
        })
    }

    pub fn from_budget(user_id: Uuid, budget: &Budget) -> Self {
        Self {
            id: budget.id,
            usuario_id: user_id,
            categoria_id: budget.category_id,
            valor: budget.amount.to_decimal(),
            periodo: budget.period.code().to_string(),
            gasto: budget.spent_hint.to_decimal(),
            limite_alerta: budget.alert_threshold,
            criado_em: budget.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use model::Money;

    use super::*;

    #[test]
    fn conta_row_maps_native_names() {
        let json = r##"{
            "id": "0b0e8f6e-9f0a-4c7e-8d32-0a4e4d9f2a11",
            "usuario_id": "7d1f32a0-15c5-4f3e-9b76-2f8a3a1c9e22",
            "nome": "Conta Corrente",
            "tipo": "banco",
            "saldo": 2500.0,
            "cor": "#3B82F6",
            "ativo": true,
            "criado_em": "2024-01-10T08:30:00Z",
            "atualizado_em": "2024-01-10T08:30:00Z"
        }"##;
        let row: ContaRow = serde_json::from_str(json).unwrap();
        let account = row.into_account().unwrap();

        assert_eq!(account.name, "Conta Corrente");
        assert_eq!(account.kind, AccountKind::Bank);
        assert_eq!(account.initial_balance, Money::new(250_000));
        assert_eq!(account.balance, account.initial_balance);
        assert!(account.active);
    }

    #[test]
    fn conta_row_rejects_unknown_kind() {
        let account = Account::new("Poupança", AccountKind::Bank, Money::ZERO, "#000");
        let mut row = ContaRow::from_account(Uuid::new_v4(), &account);
        row.tipo = "poupanca".to_string();
        assert!(row.into_account().is_err());
    }

    #[test]
    fn account_round_trips_through_its_row() {
        let user = Uuid::new_v4();
        let account = Account::new("Carteira", AccountKind::Wallet, Money::new(15_000), "#059669");
        let row = ContaRow::from_account(user, &account);

        assert_eq!(row.usuario_id, user);
        assert_eq!(row.nome, "Carteira");
        assert_eq!(row.tipo, "carteira");
        assert_eq!(row.saldo, 150.0);
        assert_eq!(row.into_account().unwrap(), account);
    }

    #[test]
    fn movimento_row_parses_its_date() {
        let tx = Transaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 5),
            ..Transaction::new(
                Polarity::Expense,
                Money::new(4550),
                "Supermercado",
                Uuid::new_v4(),
            )
        };
        let row = MovimentoRow::from_transaction(Uuid::new_v4(), &tx);

        assert_eq!(row.valor, 45.5);
        assert_eq!(row.data.as_deref(), Some("2024-03-05"));
        assert_eq!(row.recorrencia.as_deref(), Some("nenhuma"));
        assert_eq!(row.into_transaction(Polarity::Expense).unwrap(), tx);
    }

    #[test]
    fn movimento_row_tolerates_a_bad_date() {
        let tx = Transaction::new(Polarity::Income, Money::new(100), "x", Uuid::new_v4());
        let mut row = MovimentoRow::from_transaction(Uuid::new_v4(), &tx);
        row.data = Some("05/03/2024".to_string());

        let mapped = row.into_transaction(Polarity::Income).unwrap();
        assert_eq!(mapped.date, None);
        assert_eq!(mapped.amount, Money::new(100));
    }

    #[test]
    fn movimento_row_rejects_unknown_recurrence() {
        let tx = Transaction::new(Polarity::Income, Money::new(100), "x", Uuid::new_v4());
        let mut row = MovimentoRow::from_transaction(Uuid::new_v4(), &tx);
        row.recorrencia = Some("anual".to_string());
        assert!(row.into_transaction(Polarity::Income).is_err());
    }

    #[test]
    fn categoria_and_orcamento_rows_round_trip() {
        let user = Uuid::new_v4();
        let category = Category::new("Alimentação", Polarity::Expense, "🍽️", "#EF4444");
        let row = CategoriaRow::from_category(user, &category);
        assert_eq!(row.tipo, "despesa");
        assert_eq!(row.into_category().unwrap(), category);

        let budget = Budget::new(category.id, Money::new(80_000), BudgetPeriod::Monthly);
        let row = OrcamentoRow::from_budget(user, &budget);
        assert_eq!(row.periodo, "mensal");
        assert_eq!(row.limite_alerta, 0.8);
        assert_eq!(row.into_budget().unwrap(), budget);
    }

    #[test]
    fn meta_row_round_trips() {
        let mut goal = Goal::new("Reserva", Money::new(1_000_000));
        goal.saved = Money::new(250_000);
        goal.target_date = NaiveDate::from_ymd_opt(2025, 6, 1);

        let row = MetaRow::from_goal(Uuid::new_v4(), &goal);
        assert_eq!(row.valor_alvo, 10_000.0);
        assert_eq!(row.valor_atual, 2500.0);
        assert_eq!(row.into_goal().unwrap(), goal);
    }

    #[test]
    fn movement_tables_split_by_polarity() {
        assert_eq!(movement_table(Polarity::Income), "receitas");
        assert_eq!(movement_table(Polarity::Expense), "despesas");
    }
}
