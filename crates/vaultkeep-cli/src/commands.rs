//! Command handlers

use crate::output;
use crate::GlobalOpts;
use anyhow::{bail, Result};
use vaultkeep_core::{keys, PassphraseStrength, PublicKey, Signature};
use vaultkeep_params::SUPPORTED_CURRENCIES;
use vaultkeep_wallet_service::{SessionStatus, WalletService};
use zeroize::Zeroizing;

/// Where the secret for a new vault comes from
pub enum InitSecret {
    /// Supplied by the user
    Given(String),
    /// Fresh mnemonic with this many words
    Generate(usize),
}

pub async fn init(service: &WalletService, opts: &GlobalOpts, secret: InitSecret, force: bool) -> Result<()> {
    let password = opts.password()?;

    if service.status() != SessionStatus::Uninitialized && !force {
        bail!("a vault already exists; pass --force to replace it");
    }

    let (secret, generated) = match secret {
        InitSecret::Given(secret) => (Zeroizing::new(secret), false),
        InitSecret::Generate(words) => (keys::generate_mnemonic(words)?, true),
    };

    // Refuse secrets that could never sign
    let kind = keys::classify_secret(&secret)?;

    let strength = PassphraseStrength::evaluate(password);
    if !strength.is_recommended() {
        tracing::warn!("Password strength is {:?}; consider a longer passphrase", strength);
    }

    service.guard().setup_wallet(password, &secret).await?;
    if generated {
        // Shown once; the vault is the only other copy
        output::print_kv("mnemonic", &secret, opts.json);
    }
    output::print_success(&format!("Vault created ({:?})", kind), opts.json);
    Ok(())
}

pub async fn status(service: &WalletService, opts: &GlobalOpts) -> Result<()> {
    let status = service.status();
    if opts.json {
        let obj = serde_json::json!({
            "status": status,
            "vault_version": service.config().vault_version.as_u8(),
            "currency": service.currency().currency(),
        });
        println!("{}", obj);
    } else {
        output::print_kv("Status", &status.to_string(), false);
        output::print_kv("Currency", &service.currency().currency(), false);
    }
    Ok(())
}

pub async fn unlock(service: &WalletService, opts: &GlobalOpts) -> Result<()> {
    service.guard().unlock(opts.password()?).await?;
    output::print_success("Password accepted", opts.json);
    Ok(())
}

pub async fn reveal(service: &WalletService, opts: &GlobalOpts) -> Result<()> {
    let secret = service.guard().get_secret(opts.password()?).await?;
    output::print_kv("secret", &secret, opts.json);
    Ok(())
}

pub async fn sign(
    service: &WalletService,
    opts: &GlobalOpts,
    account: u32,
    bip39_passphrase: &str,
    message: &[u8],
) -> Result<()> {
    let password = opts.password()?;
    service.guard().unlock(password).await?;
    let signature = service
        .guard()
        .sign_with_passphrase(password, bip39_passphrase, account, message)
        .await?;
    output::print_kv("signature", &signature.to_hex(), opts.json);
    Ok(())
}

pub async fn pubkey(service: &WalletService, opts: &GlobalOpts, account: u32, bip39_passphrase: &str) -> Result<()> {
    let password = opts.password()?;
    service.guard().unlock(password).await?;
    let public = service
        .guard()
        .public_key_with_passphrase(password, bip39_passphrase, account)
        .await?;
    output::print_kv("public_key", &public.to_hex(), opts.json);
    Ok(())
}

pub fn verify(opts: &GlobalOpts, public_key: &str, signature: &str, message: &[u8]) -> Result<()> {
    let public = PublicKey::from_hex(public_key)?;
    let signature = Signature::from_hex(signature)?;
    vaultkeep_core::verify(&public, message, &signature)?;
    output::print_success("Signature valid", opts.json);
    Ok(())
}

pub async fn passwd(service: &WalletService, opts: &GlobalOpts, new_password: &str) -> Result<()> {
    let strength = PassphraseStrength::evaluate(new_password);
    if !strength.is_recommended() {
        tracing::warn!("New password strength is {:?}", strength);
    }
    service
        .guard()
        .change_password(opts.password()?, new_password)
        .await?;
    output::print_success("Password changed", opts.json);
    Ok(())
}

pub async fn wipe(service: &WalletService, opts: &GlobalOpts, yes: bool) -> Result<()> {
    if !yes {
        bail!("wipe deletes the vault permanently; pass --yes to confirm");
    }
    service.wipe().await?;
    output::print_success("Vault deleted", opts.json);
    Ok(())
}

pub fn currency_get(service: &WalletService, opts: &GlobalOpts) -> Result<()> {
    output::print_kv("currency", &service.currency().currency(), opts.json);
    Ok(())
}

pub async fn currency_set(service: &WalletService, opts: &GlobalOpts, code: &str) -> Result<()> {
    service.currency().set_currency(code).await?;
    output::print_kv("currency", &service.currency().currency(), opts.json);
    Ok(())
}

pub async fn currency_reset(service: &WalletService, opts: &GlobalOpts) -> Result<()> {
    service.currency().reset_currency().await?;
    output::print_kv("currency", &service.currency().currency(), opts.json);
    Ok(())
}

pub fn currency_list(opts: &GlobalOpts) -> Result<()> {
    if opts.json {
        println!("{}", serde_json::json!(SUPPORTED_CURRENCIES));
    } else {
        println!("{}", SUPPORTED_CURRENCIES.join(" "));
    }
    Ok(())
}
