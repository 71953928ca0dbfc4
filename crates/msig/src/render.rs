//! Terminal rendering of the dashboard widgets.

use crate::{
    binding::MultisigCall,
    dashboard::{Snapshot, TxList},
    query::Query,
    types::{AccountInfo, Owner, TxDetail, TxEntry, TxStatus, WalletStats},
    write::{ReceiptSummary, WritePhase},
};
use alloy_primitives::{Address, U256};
use comfy_table::{Attribute, Cell, Color, Table, presets::ASCII_MARKDOWN};
use msig_common::{
    fmt::{
        DEFAULT_TRUNCATE_LEN, explorer_address_url, explorer_tx_url, progress_bar, short_account,
        truncate_address,
    },
    shell::ColorChoice,
    units::format_units,
};
use msig_config::Network;
use serde::Serialize;
use std::fmt::Write as _;

/// Width of the confirmation progress bar.
const PROGRESS_WIDTH: usize = 10;

/// Shown to connected accounts that do not own the wallet.
pub const NOT_OWNER_WARNING: &str =
    "You are not an owner. You can view transactions but cannot interact with them.";

/// Serializes `value` as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Renders widgets for a network: amounts in its currency, links to its explorer.
#[derive(Clone, Debug)]
pub struct Renderer {
    network: Network,
    color: ColorChoice,
}

impl Renderer {
    pub fn new(network: Network) -> Self {
        Self { network, color: ColorChoice::Auto }
    }

    /// Sets whether tables are styled.
    pub fn color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// `value` in the native currency, e.g. `0.5 RBTC`.
    pub fn amount(&self, value: U256) -> String {
        format!("{} {}", format_units(value, self.network.decimals), self.network.currency_symbol)
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);
        match self.color {
            ColorChoice::Auto => {}
            ColorChoice::Always => {
                table.enforce_styling();
            }
            ColorChoice::Never => {
                table.force_no_tty();
            }
        }
        table
    }

    fn header(&self, table: &mut Table, titles: &[&str]) {
        table.set_header(
            titles.iter().map(|title| Cell::new(title).add_attribute(Attribute::Bold)),
        );
    }

    /// The stats cards, each showing its value or why it has none.
    pub fn stats(&self, stats: &WalletStats) -> String {
        let mut table = self.table();
        self.header(&mut table, &["Wallet", &stats.address.to_string()]);
        let balance = card(&stats.balance, |balance| self.amount(*balance));
        table.add_row([Cell::new("Contract Balance"), Cell::new(balance).fg(Color::Yellow)]);
        table.add_row([
            Cell::new("Total Owners"),
            Cell::new(card(&stats.owner_count, ToString::to_string)),
        ]);
        let required = card(&stats.required_confirmations, |required| {
            match stats.approval_threshold_percent() {
                Some(percent) => format!("{required} ({percent}% approval threshold)"),
                None => required.to_string(),
            }
        });
        table.add_row([Cell::new("Required Confirmations"), Cell::new(required)]);
        table.add_row([
            Cell::new("Total Transactions"),
            Cell::new(card(&stats.transaction_count, ToString::to_string)),
        ]);
        table.to_string()
    }

    /// The owners list, 1-based like the dashboard card.
    pub fn owners(&self, owners: &[Owner]) -> String {
        if owners.is_empty() {
            return "No owners found.".to_string();
        }
        let mut table = self.table();
        self.header(&mut table, &["#", "Owner", ""]);
        for owner in owners {
            let you = if owner.is_current_account {
                Cell::new("You (Current User)").fg(Color::Yellow).add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            };
            table.add_row([
                Cell::new(owner.index + 1),
                Cell::new(self.address(owner.address)),
                you,
            ]);
        }
        format!("Owners ({})\n{table}", owners.len())
    }

    /// The transaction list with its header line.
    pub fn transactions(&self, list: &TxList) -> String {
        let mut out = format!(
            "Total: {} | Required: {} / {}",
            list.total, list.required_confirmations, list.owner_count
        );
        if list.is_viewer_only() {
            let _ = write!(out, "\n{NOT_OWNER_WARNING}");
        }
        if list.total.is_zero() {
            out.push_str("\nNo transactions yet.");
            return out;
        }
        if list.rows.is_empty() {
            out.push_str("\nNo transactions match the filter.");
            return out;
        }

        let mut table = self.table();
        self.header(&mut table, &["ID", "To", "Amount", "Status", "Confirmations", "Actions"]);
        for row in &list.rows {
            match row {
                Query::Ready(entry) => {
                    table.add_row(self.entry_row(entry, list.required_confirmations));
                }
                Query::Failed(err) => {
                    table.add_row([
                        Cell::new("?"),
                        Cell::new(err).fg(Color::Red),
                        Cell::new(""),
                        Cell::new(""),
                        Cell::new(""),
                        Cell::new(""),
                    ]);
                }
                Query::Loading => {
                    table.add_row(["?", "Loading...", "", "", "", ""]);
                }
            }
        }
        let _ = write!(out, "\n{table}");
        out
    }

    fn entry_row(&self, entry: &TxEntry, required: U256) -> [Cell; 6] {
        let tx = &entry.tx;
        let actions = entry.actions.labels();
        [
            Cell::new(format!("#{}", tx.index)),
            Cell::new(truncate_address(&tx.to.to_string(), DEFAULT_TRUNCATE_LEN)),
            Cell::new(self.amount(tx.value)),
            status_cell(entry.status),
            Cell::new(self.progress(tx.num_confirmations, required, tx.progress(required))),
            Cell::new(if actions.is_empty() { "-".to_string() } else { actions.join(", ") }),
        ]
    }

    fn progress(&self, confirmations: U256, required: U256, percent: u8) -> String {
        format!("{confirmations} / {required} {} {percent}%", progress_bar(percent, PROGRESS_WIDTH))
    }

    /// The transaction detail view.
    pub fn transaction_detail(&self, detail: &TxDetail) -> String {
        let entry = &detail.entry;
        let tx = &entry.tx;
        let required = detail.required_confirmations;

        let mut table = self.table();
        self.header(&mut table, &["Transaction", &format!("#{}", tx.index)]);
        table.add_row([Cell::new("Status"), status_cell(entry.status)]);
        table.add_row([Cell::new("Recipient Address"), Cell::new(self.address(tx.to))]);
        table.add_row([Cell::new("Amount"), Cell::new(self.amount(tx.value))]);
        table.add_row([
            Cell::new("Confirmations"),
            Cell::new(self.progress(tx.num_confirmations, required, tx.progress(required))),
        ]);
        let data = if tx.data.is_empty() { "0x".to_string() } else { tx.data.to_string() };
        table.add_row([Cell::new("Transaction Data"), Cell::new(data)]);
        if let Some(confirmed) = entry.confirmed_by_account {
            table.add_row([
                Cell::new("Confirmed by you"),
                Cell::new(if confirmed { "yes" } else { "no" }),
            ]);
        }
        let confirmed_by = if detail.confirmed_by.is_empty() {
            "-".to_string()
        } else {
            detail.confirmed_by.iter().map(Address::to_string).collect::<Vec<_>>().join("\n")
        };
        table.add_row([Cell::new("Confirmed By"), Cell::new(confirmed_by)]);
        let actions = entry.actions.labels();
        if !actions.is_empty() {
            table.add_row([
                Cell::new("Actions"),
                Cell::new(actions.join(", ")).fg(Color::Cyan).add_attribute(Attribute::Bold),
            ]);
        }
        table.to_string()
    }

    /// The connected account panel.
    pub fn account(&self, account: Option<&AccountInfo>) -> String {
        let Some(account) = account else {
            return "Not connected. Pass --private-key, --mnemonic, --keystore, --account or \
                    --interactive to connect a wallet."
                .to_string();
        };
        let mut out = format!(
            "Connected: {} ({})\nBalance: {}\nNetwork: {} ({})",
            short_account(&account.address.to_string()),
            account.address,
            self.amount(account.balance),
            self.network.name,
            self.network.chain_id(),
        );
        if account.is_owner {
            out.push_str("\nYou are an owner of this wallet.");
        } else {
            let _ = write!(out, "\n{NOT_OWNER_WARNING}");
        }
        out
    }

    /// Every widget of a snapshot, a loading or error line in place of widgets that have none.
    pub fn snapshot(&self, snapshot: &Snapshot) -> String {
        let sections = [
            self.stats(&snapshot.stats),
            section(&snapshot.account, "account", |account| self.account(account.as_ref())),
            section(&snapshot.owners, "owners", |owners| self.owners(owners)),
            section(&snapshot.transactions, "transactions", |list| self.transactions(list)),
        ];
        sections.join("\n\n")
    }

    /// A status line for a write phase.
    pub fn phase(&self, call: &MultisigCall, phase: &WritePhase) -> Option<(&'static str, String)> {
        let line = match phase {
            WritePhase::Idle => return None,
            WritePhase::AwaitingSignature => ("Signing", format!("{call}")),
            WritePhase::AwaitingInclusion(hash) => ("Waiting", self.tx_link(*hash)),
            WritePhase::Confirmed(receipt) => ("Confirmed", self.receipt(call, receipt)),
            WritePhase::Failed(err) => ("Failed", err.to_string()),
        };
        Some(line)
    }

    fn receipt(&self, call: &MultisigCall, receipt: &ReceiptSummary) -> String {
        let block = receipt.block_number.map(|n| format!(" in block {n}")).unwrap_or_default();
        format!("{}{block} (gas used: {})", call.label(), receipt.gas_used)
    }

    /// The transaction hash, followed by its explorer link when the network has an explorer.
    pub fn tx_link(&self, hash: impl std::fmt::Display) -> String {
        match &self.network.explorer_url {
            Some(explorer) => {
                let url = explorer_tx_url(explorer, &hash);
                format!("{hash} ({url})")
            }
            None => hash.to_string(),
        }
    }

    fn address(&self, address: Address) -> String {
        match &self.network.explorer_url {
            Some(explorer) => format!("{address}\n{}", explorer_address_url(explorer, address)),
            None => address.to_string(),
        }
    }
}

fn status_cell(status: TxStatus) -> Cell {
    let color = match status {
        TxStatus::Pending => Color::Yellow,
        TxStatus::Executed => Color::Green,
    };
    Cell::new(status).fg(color)
}

/// A single stats card value.
fn card<T>(query: &Query<T>, render: impl FnOnce(&T) -> String) -> String {
    match query {
        Query::Loading => "...".to_string(),
        Query::Ready(value) => render(value),
        Query::Failed(err) => format!("Error: {err}"),
    }
}

fn section<T>(query: &Query<T>, what: &str, render: impl FnOnce(&T) -> String) -> String {
    match query {
        Query::Loading => format!("Loading {what}..."),
        Query::Ready(value) => render(value),
        Query::Failed(err) => format!("Error: {err}"),
    }
}
