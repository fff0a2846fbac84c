use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adapter::units::{Token, from_base_units};
use crate::chain::ChainReader;
use crate::error::{ArenaError, Result};
use crate::models::SeasonStatus;

/// Smallest deposit a user may make, in USDC base units (10 USDC).
pub const MIN_USER_DEPOSIT: u64 = 10_000_000;

pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// What a user asks the wallet to do. Building and signing the actual
/// transaction is the wallet's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum TransactionIntent {
    Deposit {
        season_number: u64,
        ai_name: String,
        amount: u64,
    },
    Withdraw {
        season_number: u64,
        ai_name: String,
        lp_token_id: String,
    },
}

impl TransactionIntent {
    pub fn season_number(&self) -> u64 {
        match self {
            TransactionIntent::Deposit { season_number, .. }
            | TransactionIntent::Withdraw { season_number, .. } => *season_number,
        }
    }

    pub fn ai_name(&self) -> &str {
        match self {
            TransactionIntent::Deposit { ai_name, .. }
            | TransactionIntent::Withdraw { ai_name, .. } => ai_name,
        }
    }

    /// Checks the contract would otherwise reject: deposits only before the
    /// season starts and above the minimum, withdrawals only once it has ended.
    pub fn validate(&self, status: SeasonStatus) -> Result<()> {
        match self {
            TransactionIntent::Deposit { amount, .. } => {
                if !status.can_deposit() {
                    return Err(ArenaError::SeasonClosed {
                        season: self.season_number(),
                        status: status.label().to_string(),
                    });
                }
                if *amount < MIN_USER_DEPOSIT {
                    return Err(ArenaError::DepositBelowMinimum {
                        amount: *amount,
                        minimum: MIN_USER_DEPOSIT,
                    });
                }
                Ok(())
            }
            TransactionIntent::Withdraw { .. } => {
                if status.can_withdraw() {
                    Ok(())
                } else {
                    Err(ArenaError::SeasonClosed {
                        season: self.season_number(),
                        status: status.label().to_string(),
                    })
                }
            }
        }
    }
}

/// Account provider and signer.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Address of the connected account, if any.
    fn current_account(&self) -> Option<String>;

    /// Sign and submit an intent, returning the transaction digest.
    async fn sign_and_execute(&self, intent: &TransactionIntent) -> Result<String>;
}

/// Wallet that knows an address but holds no keys.
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyWallet {
    address: Option<String>,
}

impl ReadOnlyWallet {
    pub fn new(address: Option<String>) -> Self {
        Self { address }
    }
}

#[async_trait]
impl WalletProvider for ReadOnlyWallet {
    fn current_account(&self) -> Option<String> {
        self.address.clone()
    }

    async fn sign_and_execute(&self, intent: &TransactionIntent) -> Result<String> {
        if self.address.is_none() {
            return Err(ArenaError::WalletNotConnected);
        }
        warn!(
            "Refusing to sign {} intent for {}: wallet is read-only",
            match intent {
                TransactionIntent::Deposit { .. } => "deposit",
                TransactionIntent::Withdraw { .. } => "withdraw",
            },
            intent.ai_name()
        );
        Err(ArenaError::SigningUnavailable)
    }
}

/// Display balances of the coins the dashboard cares about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct WalletBalances {
    pub sui: f64,
    pub usdc: f64,
    pub btc: f64,
}

/// Read SUI, USDC and BTC balances for `owner`. A coin type the node does not
/// know counts as zero; a failure on SUI itself is an error.
pub async fn wallet_balances(
    chain: &dyn ChainReader,
    owner: &str,
    usdc_coin_type: &str,
    btc_coin_type: &str,
) -> Result<WalletBalances> {
    let (sui, usdc, btc) = futures::join!(
        chain.get_balance(owner, SUI_COIN_TYPE),
        chain.get_balance(owner, usdc_coin_type),
        chain.get_balance(owner, btc_coin_type),
    );

    let or_zero = |result: Result<u128>, symbol: &str| match result {
        Ok(raw) => raw,
        Err(e) => {
            warn!("No {} balance for {}: {}", symbol, owner, e);
            0
        }
    };

    let balances = WalletBalances {
        sui: from_base_units(sui?, Token::Sui),
        usdc: from_base_units(or_zero(usdc, "USDC"), Token::Usdc),
        btc: from_base_units(or_zero(btc, "BTC"), Token::Btc),
    };

    info!(
        "Balances for {}: SUI={:.4}, USDC={:.2}, BTC={:.8}",
        owner, balances.sui, balances.usdc, balances.btc
    );
    Ok(balances)
}
