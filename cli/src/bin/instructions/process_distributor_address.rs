use anchor_spl::associated_token::get_associated_token_address;

use crate::*;

pub fn process_distributor_address(args: &Args, address_args: &DistributorAddressArgs) {
    let (distributor, bump) = get_merkle_distributor_pda(&args.program_id, address_args.campaign_id);
    let (factory, _bump) = get_factory_pda(&args.program_id);
    let token_vault = get_associated_token_address(&distributor, &address_args.mint);

    println!("distributor: {distributor} (bump {bump})");
    println!("token vault: {token_vault}");
    println!("factory:     {factory}");
}
