//! HTTP implementation of [`Store`] against the hosted service's REST
//! interface.
//!
//! Conventions: rows live under `rest/v1/<table>`; reads filter with
//! `usuario_id=eq.<uid>`; writes address single rows with `id=eq.<id>`.
//! Every request carries the project api key plus the session's bearer
//! token, so the service applies its own row-level ownership checks on
//! top of the query filters.

use model::{Account, Budget, Category, Goal, Polarity, Session, Transaction};
use reqwest::{RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    ResultStore, Store, StoreError,
    rows::{
        CategoriaRow, ContaRow, MetaRow, MovimentoRow, OrcamentoRow, TABLE_ACCOUNTS,
        TABLE_BUDGETS, TABLE_CATEGORIES, TABLE_EXPENSES, TABLE_GOALS, TABLE_INCOMES,
        movement_table,
    },
};

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// REST client for the hosted store. Cheap to clone; the inner HTTP
/// client is shared.
#[derive(Clone, Debug)]
pub struct RestStore {
    base_url: Url,
    api_key: String,
    http: reqwest::Client,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> ResultStore<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|err| StoreError::Server(format!("invalid base url: {err}")))?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, table: &str) -> ResultStore<Url> {
        self.base_url
            .join(&format!("rest/v1/{table}"))
            .map_err(|err| StoreError::Server(format!("invalid base url: {err}")))
    }

    fn authorize(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
    }

    async fn list<R: DeserializeOwned>(
        &self,
        session: &Session,
        table: &str,
    ) -> ResultStore<Vec<R>> {
        let mut endpoint = self.endpoint(table)?;
        endpoint
            .query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("usuario_id", &format!("eq.{}", session.user_id));

        let res = self
            .authorize(self.http.get(endpoint), session)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::reject(res).await);
        }
        Ok(res.json::<Vec<R>>().await?)
    }

    async fn insert<R: Serialize>(
        &self,
        session: &Session,
        table: &str,
        row: &R,
    ) -> ResultStore<()> {
        let endpoint = self.endpoint(table)?;
        let res = self
            .authorize(self.http.post(endpoint), session)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        Self::confirm(table, res).await
    }

    async fn update<R: Serialize>(
        &self,
        session: &Session,
        table: &str,
        id: Uuid,
        row: &R,
    ) -> ResultStore<()> {
        let endpoint = self.row_endpoint(session, table, id)?;
        let res = self
            .authorize(self.http.patch(endpoint), session)
            .json(row)
            .send()
            .await?;
        Self::confirm(table, res).await
    }

    async fn delete(&self, session: &Session, table: &str, id: Uuid) -> ResultStore<()> {
        let endpoint = self.row_endpoint(session, table, id)?;
        let res = self
            .authorize(self.http.delete(endpoint), session)
            .send()
            .await?;
        Self::confirm(table, res).await
    }

    fn row_endpoint(&self, session: &Session, table: &str, id: Uuid) -> ResultStore<Url> {
        let mut endpoint = self.endpoint(table)?;
        endpoint
            .query_pairs_mut()
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("usuario_id", &format!("eq.{}", session.user_id));
        Ok(endpoint)
    }

    async fn confirm(table: &str, res: Response) -> ResultStore<()> {
        if res.status().is_success() {
            return Ok(());
        }
        let err = Self::reject(res).await;
        tracing::debug!(table, %err, "store write rejected");
        Err(err)
    }

    /// Classifies a failed response, surfacing the service's own message
    /// unmodified.
    async fn reject(res: Response) -> StoreError {
        let status = res.status();
        let message = res
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| "unknown error".to_string());

        match status.as_u16() {
            401 => StoreError::Unauthorized,
            403 => StoreError::Forbidden,
            404 => StoreError::NotFound,
            409 => StoreError::Conflict(message),
            422 => StoreError::Validation(message),
            _ => StoreError::Server(message),
        }
    }
}

impl Store for RestStore {
    async fn fetch_accounts(&self, session: &Session) -> ResultStore<Vec<Account>> {
        self.list::<ContaRow>(session, TABLE_ACCOUNTS)
            .await?
            .into_iter()
            .map(ContaRow::into_account)
            .collect()
    }

    async fn fetch_categories(&self, session: &Session) -> ResultStore<Vec<Category>> {
        self.list::<CategoriaRow>(session, TABLE_CATEGORIES)
            .await?
            .into_iter()
            .map(CategoriaRow::into_category)
            .collect()
    }

    async fn fetch_incomes(&self, session: &Session) -> ResultStore<Vec<Transaction>> {
        self.list::<MovimentoRow>(session, TABLE_INCOMES)
            .await?
            .into_iter()
            .map(|row| row.into_transaction(Polarity::Income))
            .collect()
    }

    async fn fetch_expenses(&self, session: &Session) -> ResultStore<Vec<Transaction>> {
        self.list::<MovimentoRow>(session, TABLE_EXPENSES)
            .await?
            .into_iter()
            .map(|row| row.into_transaction(Polarity::Expense))
            .collect()
    }

    async fn fetch_goals(&self, session: &Session) -> ResultStore<Vec<Goal>> {
        self.list::<MetaRow>(session, TABLE_GOALS)
            .await?
            .into_iter()
            .map(MetaRow::into_goal)
            .collect()
    }

    async fn fetch_budgets(&self, session: &Session) -> ResultStore<Vec<Budget>> {
        self.list::<OrcamentoRow>(session, TABLE_BUDGETS)
            .await?
            .into_iter()
            .map(OrcamentoRow::into_budget)
            .collect()
    }

    async fn insert_account(&self, session: &Session, account: &Account) -> ResultStore<()> {
        let row = ContaRow::from_account(session.user_id, account);
        self.insert(session, TABLE_ACCOUNTS, &row).await
    }

    async fn update_account(&self, session: &Session, account: &Account) -> ResultStore<()> {
        let row = ContaRow::from_account(session.user_id, account);
        self.update(session, TABLE_ACCOUNTS, account.id, &row).await
    }

    async fn delete_account(&self, session: &Session, id: Uuid) -> ResultStore<()> {
        self.delete(session, TABLE_ACCOUNTS, id).await
    }

    async fn insert_category(&self, session: &Session, category: &Category) -> ResultStore<()> {
        let row = CategoriaRow::from_category(session.user_id, category);
        self.insert(session, TABLE_CATEGORIES, &row).await
    }

    async fn update_category(&self, session: &Session, category: &Category) -> ResultStore<()> {
        let row = CategoriaRow::from_category(session.user_id, category);
        self.update(session, TABLE_CATEGORIES, category.id, &row).await
    }

    async fn delete_category(&self, session: &Session, id: Uuid) -> ResultStore<()> {
        self.delete(session, TABLE_CATEGORIES, id).await
    }

    async fn insert_transaction(&self, session: &Session, tx: &Transaction) -> ResultStore<()> {
        let row = MovimentoRow::from_transaction(session.user_id, tx);
        self.insert(session, movement_table(tx.polarity), &row).await
    }

    async fn update_transaction(
        &self,
        session: &Session,
        previous: Polarity,
        tx: &Transaction,
    ) -> ResultStore<()> {
        let row = MovimentoRow::from_transaction(session.user_id, tx);
        if previous == tx.polarity {
            return self.update(session, movement_table(previous), tx.id, &row).await;
        }
        // Polarity changed: the entry moves between the two movement
        // tables under the same id.
        self.delete(session, movement_table(previous), tx.id).await?;
        self.insert(session, movement_table(tx.polarity), &row).await
    }

    async fn delete_transaction(
        &self,
        session: &Session,
        polarity: Polarity,
        id: Uuid,
    ) -> ResultStore<()> {
        self.delete(session, movement_table(polarity), id).await
    }

    async fn insert_goal(&self, session: &Session, goal: &Goal) -> ResultStore<()> {
        let row = MetaRow::from_goal(session.user_id, goal);
        self.insert(session, TABLE_GOALS, &row).await
    }

    async fn update_goal(&self, session: &Session, goal: &Goal) -> ResultStore<()> {
        let row = MetaRow::from_goal(session.user_id, goal);
        self.update(session, TABLE_GOALS, goal.id, &row).await
    }

    async fn delete_goal(&self, session: &Session, id: Uuid) -> ResultStore<()> {
        self.delete(session, TABLE_GOALS, id).await
    }

    async fn insert_budget(&self, session: &Session, budget: &Budget) -> ResultStore<()> {
        let row = OrcamentoRow::from_budget(session.user_id, budget);
        self.insert(session, TABLE_BUDGETS, &row).await
    }

    async fn update_budget(&self, session: &Session, budget: &Budget) -> ResultStore<()> {
        let row = OrcamentoRow::from_budget(session.user_id, budget);
        self.update(session, TABLE_BUDGETS, budget.id, &row).await
    }

    async fn delete_budget(&self, session: &Session, id: Uuid) -> ResultStore<()> {
        self.delete(session, TABLE_BUDGETS, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_a_trailing_slash() {
        let store = RestStore::new("http://127.0.0.1:54321", "anon-key").unwrap();
        let endpoint = store.endpoint("contas").unwrap();
        assert_eq!(endpoint.as_str(), "http://127.0.0.1:54321/rest/v1/contas");
    }

    #[test]
    fn rejects_an_unparseable_base_url() {
        assert!(RestStore::new("not a url", "anon-key").is_err());
    }

    #[test]
    fn row_endpoint_scopes_by_owner_and_id() {
        let store = RestStore::new("http://127.0.0.1:54321/", "anon-key").unwrap();
        let session = Session::new(Uuid::nil(), "a@b.c", "token");
        let endpoint = store.row_endpoint(&session, "metas", Uuid::nil()).unwrap();
        let query = endpoint.query().unwrap();

        assert!(query.contains("id=eq.00000000-0000-0000-0000-000000000000"));
        assert!(query.contains("usuario_id=eq.00000000-0000-0000-0000-000000000000"));
    }
}
