#![no_std]

use soroban_sdk::{
  contract, contractclient, contracterror, contractevent, contractimpl, contracttype,
  panic_with_error, token, Address, Env,
};

/// Receive-path hook for crowns held by contracts.
///
/// A plain account cannot refuse a token transfer, so claimants that want
/// programmable receive behavior register a contract implementing this trait
/// alongside their claim. The throne invokes `on_refund` every time it pays
/// the escrowed prize back to that owner; if the hook fails for any reason,
/// the dethroning claim fails as a whole.
#[contractclient(name = "PrizeReceiverClient")]
pub trait PrizeReceiver {
  fn on_refund(env: Env, from: Address, amount: i128);
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
  InsufficientOffer = 1,
  RefundFailed = 2,
  InvalidAmount = 3,
}

/// Current holder of the crown and the escrow owed to them.
///
/// Invariant: `prize` equals the token balance the throne holds on behalf of
/// `owner`. `receiver` is the refund hook the owner registered at claim time,
/// `None` for plain accounts.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Crown {
  pub owner: Address,
  pub prize: i128,
  pub receiver: Option<Address>,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey { Crown, Token }

#[contractevent]
pub struct Crowned {
  #[topic]
  pub owner: Address,
  pub prize: i128,
  pub previous_owner: Address,
  pub refund: i128,
}

#[contract]
pub struct ThroneContract;

#[contractimpl]
impl ThroneContract {
  pub fn __constructor(env: Env, deployer: Address, token: Address, initial_prize: i128) {
    if initial_prize < 0 {
      panic_with_error!(&env, Error::InvalidAmount);
    }
    deployer.require_auth();

    if initial_prize > 0 {
      let token_client = token::Client::new(&env, &token);
      token_client.transfer(&deployer, &env.current_contract_address(), &initial_prize);
    }

    env.storage().instance().set(&DataKey::Token, &token);
    env.storage().instance().set(&DataKey::Crown, &Crown {
      owner: deployer,
      prize: initial_prize,
      receiver: None,
    });
  }

  /// Take the crown by escrowing `amount`, which must strictly exceed the
  /// current prize. The previous owner is refunded their escrow inside the
  /// same invocation; if that refund cannot complete, the whole claim is
  /// rolled back and the throne is left untouched.
  ///
  /// `receiver` optionally registers a [`PrizeReceiver`] contract to be
  /// invoked when this claimant is refunded in turn.
  pub fn claim(env: Env, claimant: Address, amount: i128, receiver: Option<Address>) -> Result<(), Error> {
    claimant.require_auth();
    if amount <= 0 { return Err(Error::InvalidAmount); }

    let crown: Crown = env.storage().instance().get(&DataKey::Crown).expect("crown not set");
    if amount <= crown.prize { return Err(Error::InsufficientOffer); }

    let token_addr: Address = env.storage().instance().get(&DataKey::Token).expect("token not set");
    let token_client = token::Client::new(&env, &token_addr);
    let escrow = env.current_contract_address();

    token_client.transfer(&claimant, &escrow, &amount);

    if crown.prize > 0 {
      token_client.transfer(&escrow, &crown.owner, &crown.prize);
    }
    if let Some(hook) = &crown.receiver {
      // Returning RefundFailed aborts the invocation, so the host discards
      // both transfers above along with the pending crown update.
      let old_owner = PrizeReceiverClient::new(&env, hook);
      if old_owner.try_on_refund(&escrow, &crown.prize).is_err() {
        return Err(Error::RefundFailed);
      }
    }

    env.storage().instance().set(&DataKey::Crown, &Crown {
      owner: claimant.clone(),
      prize: amount,
      receiver,
    });

    Crowned {
      owner: claimant,
      prize: amount,
      previous_owner: crown.owner,
      refund: crown.prize,
    }
    .publish(&env);
    Ok(())
  }

  pub fn owner(env: Env) -> Address {
    Self::get_crown(env).owner
  }

  pub fn prize(env: Env) -> i128 {
    Self::get_crown(env).prize
  }

  pub fn get_crown(env: Env) -> Crown {
    env.storage().instance().get(&DataKey::Crown).expect("crown not set")
  }

  pub fn get_token(env: Env) -> Address {
    env.storage().instance().get(&DataKey::Token).expect("token not set")
  }
}
