//! Output formatting for human-readable and JSON modes

use vaultkeep_wallet_service::Error as WalletError;

/// Print a success message
pub fn print_success(msg: &str, json_mode: bool) {
    if json_mode {
        let obj = serde_json::json!({ "status": "ok", "message": msg });
        println!("{}", obj);
    } else {
        println!("{}", msg);
    }
}

/// Print a single key-value pair
pub fn print_kv(key: &str, value: &str, json_mode: bool) {
    if json_mode {
        let obj = serde_json::json!({ key: value });
        println!("{}", obj);
    } else {
        println!("{}: {}", key, value);
    }
}

/// Print an error; wallet errors get their user-facing message
pub fn print_error(err: &anyhow::Error, json_mode: bool) {
    let msg = match err.downcast_ref::<WalletError>() {
        Some(wallet) if wallet.is_user_error() => wallet.user_message(),
        Some(wallet) => format!("{} ({})", wallet, wallet.category()),
        None => format!("{:#}", err),
    };
    if json_mode {
        let obj = serde_json::json!({ "error": msg });
        eprintln!("{}", obj);
    } else {
        eprintln!("error: {}", msg);
    }
}
