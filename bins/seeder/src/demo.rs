//! Demo fixture: a month of trading for a small grocery wholesaler.
//!
//! Parties and items are referenced by their position in the fixture, accounts
//! by code, so the file stays readable without knowing generated ids.

use anyhow::{Context, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::info;

use mizan_core::Books;
use mizan_core::ManualEntryInput;
use mizan_core::OpeningBalances;
use mizan_core::inventory::{NewItem, UnitRef};
use mizan_core::journal::LineDraft;
use mizan_core::party::NewParty;
use mizan_core::trade::{
    AdjustmentInput, AdjustmentKind, Counterparty, LineItemInput, Settlement, TradeInput,
    TransferInput, TreasuryInput, TreasuryKind,
};
use mizan_shared::LedgerSettings;
use mizan_shared::types::{
    AccountId, CustomerId, ItemId, MoneyError, SupplierId, parse_amount, parse_quantity, parse_signed,
};

/// The fixture bundled with the binary.
pub const BUNDLED: &str = include_str!("../data/demo.json");

/// A demo scenario.
#[derive(Debug, Deserialize)]
pub struct Demo {
    /// Actor recorded in the activity log.
    #[serde(default = "default_actor")]
    pub actor: String,
    opening_balances: Vec<OpeningLine>,
    units: Vec<String>,
    customers: Vec<NewParty>,
    suppliers: Vec<NewParty>,
    items: Vec<NewItem>,
    documents: Vec<Document>,
}

fn default_actor() -> String {
    "seeder".to_string()
}

// Numbers are written as strings and checked here, before any document is built.

fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    number(deserializer, parse_amount)
}

fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    number(deserializer, parse_quantity)
}

fn signed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    number(deserializer, parse_signed)
}

fn number<'de, D: Deserializer<'de>>(
    deserializer: D,
    parse: fn(&str) -> Result<Decimal, MoneyError>,
) -> Result<Decimal, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text).map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize)]
struct OpeningLine {
    code: String,
    #[serde(deserialize_with = "signed")]
    amount: Decimal,
}

#[derive(Debug, Deserialize)]
struct Line {
    item: usize,
    #[serde(default)]
    unit: Option<String>,
    #[serde(deserialize_with = "quantity")]
    quantity: Decimal,
    #[serde(deserialize_with = "amount")]
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct EntryLine {
    code: String,
    #[serde(default, deserialize_with = "amount")]
    debit: Decimal,
    #[serde(default, deserialize_with = "amount")]
    credit: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Document {
    Purchase {
        date: NaiveDate,
        supplier: usize,
        #[serde(default)]
        cash: Option<String>,
        lines: Vec<Line>,
        #[serde(default)]
        notes: String,
    },
    Sale {
        date: NaiveDate,
        #[serde(default)]
        customer: Option<usize>,
        #[serde(default)]
        cash: Option<String>,
        lines: Vec<Line>,
        #[serde(default)]
        notes: String,
    },
    SaleReturn {
        date: NaiveDate,
        customer: usize,
        lines: Vec<Line>,
        #[serde(default)]
        notes: String,
    },
    Adjustment {
        date: NaiveDate,
        kind: AdjustmentKind,
        contra: String,
        lines: Vec<Line>,
        #[serde(default)]
        notes: String,
    },
    Receipt {
        date: NaiveDate,
        treasury: String,
        customer: usize,
        #[serde(deserialize_with = "amount")]
        amount: Decimal,
    },
    SupplierPayment {
        date: NaiveDate,
        treasury: String,
        supplier: usize,
        #[serde(deserialize_with = "amount")]
        amount: Decimal,
    },
    Expense {
        date: NaiveDate,
        treasury: String,
        account: String,
        #[serde(deserialize_with = "amount")]
        amount: Decimal,
        #[serde(default)]
        description: String,
    },
    Transfer {
        date: NaiveDate,
        from: String,
        to: String,
        #[serde(deserialize_with = "amount")]
        amount: Decimal,
        #[serde(default)]
        note: String,
    },
    JournalEntry {
        date: NaiveDate,
        description: String,
        lines: Vec<EntryLine>,
    },
}

/// Generated ids, in fixture order.
struct Seeded {
    customers: Vec<CustomerId>,
    suppliers: Vec<SupplierId>,
    items: Vec<ItemId>,
}

impl Demo {
    /// Parses a fixture.
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Invalid demo fixture")
    }

    /// Opens books on the default chart and replays the scenario.
    pub fn seed(self, settings: LedgerSettings) -> anyhow::Result<Books> {
        let mut books = Books::new(settings)?.with_actor(self.actor);

        for unit in &self.units {
            books.add_unit_definition(unit)?;
        }
        let mut seeded = Seeded {
            customers: Vec::new(),
            suppliers: Vec::new(),
            items: Vec::new(),
        };
        for party in self.customers {
            seeded.customers.push(books.add_customer(party)?.id);
        }
        for party in self.suppliers {
            seeded.suppliers.push(books.add_supplier(party)?.id);
        }
        for item in self.items {
            seeded.items.push(books.add_item(item)?.id);
        }

        let accounts = self
            .opening_balances
            .iter()
            .map(|line| Ok((account(&books, &line.code)?, line.amount)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        books.update_all_opening_balances(&OpeningBalances {
            accounts,
            ..OpeningBalances::default()
        })?;

        let count = self.documents.len();
        for (index, document) in self.documents.into_iter().enumerate() {
            seeded
                .apply(&mut books, document)
                .with_context(|| format!("Demo document #{index} was rejected"))?;
        }
        info!(documents = count, entries = books.journal().len(), "Demo books seeded");
        Ok(books)
    }
}

impl Seeded {
    fn apply(&self, books: &mut Books, document: Document) -> anyhow::Result<()> {
        match document {
            Document::Purchase {
                date,
                supplier,
                cash,
                lines,
                notes,
            } => {
                let input = TradeInput {
                    date,
                    party: Some(pick(&self.suppliers, supplier, "supplier")?),
                    settlement: settlement(books, cash.as_deref())?,
                    lines: self.lines(books, &lines)?,
                    notes,
                };
                books.add_purchase(input)?;
            }
            Document::Sale {
                date,
                customer,
                cash,
                lines,
                notes,
            } => {
                let party = customer
                    .map(|index| pick(&self.customers, index, "customer"))
                    .transpose()?;
                let input = TradeInput {
                    date,
                    party,
                    settlement: settlement(books, cash.as_deref())?,
                    lines: self.lines(books, &lines)?,
                    notes,
                };
                books.add_sale(input)?;
            }
            Document::SaleReturn {
                date,
                customer,
                lines,
                notes,
            } => {
                let input = TradeInput {
                    date,
                    party: Some(pick(&self.customers, customer, "customer")?),
                    settlement: Settlement::OnAccount,
                    lines: self.lines(books, &lines)?,
                    notes,
                };
                books.add_sale_return(input)?;
            }
            Document::Adjustment {
                date,
                kind,
                contra,
                lines,
                notes,
            } => {
                let input = AdjustmentInput {
                    date,
                    kind,
                    contra_account: account(books, &contra)?,
                    lines: self.lines(books, &lines)?,
                    notes,
                };
                books.add_inventory_adjustment(input)?;
            }
            Document::Receipt {
                date,
                treasury,
                customer,
                amount,
            } => {
                let counterparty = Counterparty::Customer(pick(&self.customers, customer, "customer")?);
                let input = voucher(books, date, TreasuryKind::Receipt, &treasury, counterparty, amount)?;
                books.add_treasury_transaction(input)?;
            }
            Document::SupplierPayment {
                date,
                treasury,
                supplier,
                amount,
            } => {
                let counterparty = Counterparty::Supplier(pick(&self.suppliers, supplier, "supplier")?);
                let input = voucher(books, date, TreasuryKind::Payment, &treasury, counterparty, amount)?;
                books.add_treasury_transaction(input)?;
            }
            Document::Expense {
                date,
                treasury,
                account: code,
                amount,
                description,
            } => {
                let counterparty = Counterparty::Account(account(books, &code)?);
                let mut input = voucher(books, date, TreasuryKind::Payment, &treasury, counterparty, amount)?;
                input.description = description;
                books.add_treasury_transaction(input)?;
            }
            Document::Transfer {
                date,
                from,
                to,
                amount,
                note,
            } => {
                let input = TransferInput {
                    date,
                    from: account(books, &from)?,
                    to: account(books, &to)?,
                    amount,
                    note,
                };
                books.transfer_treasury_funds(input)?;
            }
            Document::JournalEntry {
                date,
                description,
                lines,
            } => {
                let lines = lines
                    .iter()
                    .map(|line| {
                        Ok(LineDraft {
                            account_id: account(books, &line.code)?,
                            debit: line.debit,
                            credit: line.credit,
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                let id = books
                    .add_journal_entry(ManualEntryInput {
                        date,
                        description,
                        lines,
                    })?
                    .id;
                books.post_journal_entry(id)?;
            }
        }
        Ok(())
    }

    fn lines(&self, books: &Books, lines: &[Line]) -> anyhow::Result<Vec<LineItemInput>> {
        lines
            .iter()
            .map(|line| {
                let item_id = pick(&self.items, line.item, "item")?;
                let item = books.item(item_id)?;
                let unit = match line.unit.as_deref() {
                    None => UnitRef::Base,
                    Some(name) if name.eq_ignore_ascii_case(&item.base_unit) => UnitRef::Base,
                    Some(name) => item
                        .units
                        .iter()
                        .find(|u| u.name.eq_ignore_ascii_case(name))
                        .map(|u| UnitRef::Packing(u.id))
                        .with_context(|| format!("{} has no unit {name:?}", item.name))?,
                };
                Ok(LineItemInput {
                    item_id,
                    unit,
                    quantity: line.quantity,
                    price: line.price,
                })
            })
            .collect()
    }
}

fn pick<T: Copy>(ids: &[T], index: usize, what: &str) -> anyhow::Result<T> {
    match ids.get(index) {
        Some(id) => Ok(*id),
        None => bail!("No {what} at position {index}"),
    }
}

fn account(books: &Books, code: &str) -> anyhow::Result<AccountId> {
    Ok(books.chart().find_by_code(code)?.id)
}

fn settlement(books: &Books, cash: Option<&str>) -> anyhow::Result<Settlement> {
    Ok(match cash {
        None => Settlement::OnAccount,
        Some(code) => Settlement::Cash {
            treasury: Some(account(books, code)?),
        },
    })
}

fn voucher(
    books: &Books,
    date: NaiveDate,
    kind: TreasuryKind,
    treasury: &str,
    counterparty: Counterparty,
    amount: Decimal,
) -> anyhow::Result<TreasuryInput> {
    Ok(TreasuryInput {
        date,
        kind,
        treasury: account(books, treasury)?,
        counterparty,
        amount,
        description: String::new(),
    })
}
