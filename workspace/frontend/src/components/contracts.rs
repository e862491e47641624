use compute::{ContractAlert, VendorDirectory};
use model::Contract;

use super::table::TextTable;

pub const EMPTY_MESSAGE: &str = "No contracts found.";

/// The "Contract Repository" table. `alert` classifies each row; rows in
/// the expiring window are flagged with `!`, lapsed ones with `x`.
pub fn render<F>(contracts: &[Contract], directory: &VendorDirectory<'_>, alert: F) -> String
where
    F: Fn(&Contract) -> Option<ContractAlert>,
{
    let mut out = String::from("Contract Repository\n\n");
    if contracts.is_empty() {
        out.push_str(EMPTY_MESSAGE);
        out.push('\n');
        return out;
    }

    let mut table = TextTable::new(["", "Contract Name", "Vendor", "End Date", "Value"]);
    for contract in contracts {
        let flag = match alert(contract) {
            Some(ContractAlert::ExpiringSoon { .. }) => "!",
            Some(ContractAlert::Expired { .. }) => "x",
            None => "",
        };
        table.row([
            flag.to_string(),
            contract.contract_name.clone(),
            directory.name_of(contract.vendor_id.as_ref()).to_string(),
            contract.end_date.map(common::format_date).unwrap_or_default(),
            contract.value.map(common::format_money).unwrap_or_default(),
        ]);
    }
    out.push_str(&table.render());
    out
}
