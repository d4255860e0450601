//! Customer directory commands

use super::{print_json, CliResult, Context};
use clap::{Args, Subcommand};
use custrack_core::model::LicenseType;
use custrack_core::{CustomerFilter, CustomerPatch};
use custrack_engine::{apply_engine_command, EngineCommand};

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers, one page at a time
    List {
        /// Case-insensitive substring over name, licensed-to and site URL
        #[arg(long, default_value = "")]
        search: String,
        /// Sort column (name, csm, ae, tam, type, site_url, licensed_to, last_updated)
        #[arg(long, default_value = "name")]
        sort: String,
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
        #[arg(long, default_value = "0")]
        page: String,
        /// Page size; 0 uses the configured default
        #[arg(long, default_value = "0")]
        per_page: String,
    },
    /// Show a customer with its current snapshots
    Show { id: String },
    /// Show a customer's audit trail and snapshot versions
    History { id: String },
    /// Edit a customer's descriptive fields
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: String,

    /// User id recorded on the audit entry
    #[arg(long)]
    pub actor: String,

    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub csm: Option<String>,
    #[arg(long)]
    pub ae: Option<String>,
    #[arg(long)]
    pub tam: Option<String>,
    #[arg(long)]
    pub product_manager: Option<String>,
    #[arg(long)]
    pub salesforce_id: Option<String>,
    #[arg(long)]
    pub zendesk_id: Option<String>,
    #[arg(long)]
    pub license_type: Option<LicenseType>,
    #[arg(long)]
    pub licensed_to: Option<String>,
    #[arg(long)]
    pub site_url: Option<String>,
    #[arg(long)]
    pub channel: Option<String>,
    #[arg(long)]
    pub gdrive_link: Option<String>,
    #[arg(long)]
    pub air_gapped: Option<bool>,
    #[arg(long)]
    pub air_gapped_reason: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub company_type: Option<String>,
    #[arg(long)]
    pub code_word: Option<String>,
}

impl UpdateArgs {
    fn patch(&self) -> CustomerPatch {
        CustomerPatch {
            name: self.name.clone(),
            customer_success_manager: self.csm.clone(),
            account_executive: self.ae.clone(),
            technical_account_manager: self.tam.clone(),
            product_manager: self.product_manager.clone(),
            salesforce_id: self.salesforce_id.clone(),
            zendesk_id: self.zendesk_id.clone(),
            license_type: self.license_type,
            licensed_to: self.licensed_to.clone(),
            site_url: self.site_url.clone(),
            customer_channel: self.channel.clone(),
            gdrive_link: self.gdrive_link.clone(),
            air_gapped: self.air_gapped,
            air_gapped_reason: self.air_gapped_reason.clone(),
            region: self.region.clone(),
            status: self.status.clone(),
            company_type: self.company_type.clone(),
            code_word: self.code_word.clone(),
        }
    }
}

pub fn execute(ctx: &Context, args: CustomersArgs) -> CliResult {
    let service = ctx.service()?;
    match args.command {
        CustomersCommand::List {
            search,
            sort,
            order,
            page,
            per_page,
        } => {
            let filter = CustomerFilter::from_query_pairs([
                ("searchTerm", search),
                ("sort", sort),
                ("order", order),
                ("page", page),
                ("perPage", per_page),
            ])?;
            print_json(&service.list_customers(&filter)?)
        }
        CustomersCommand::Show { id } => print_json(&service.get_customer(&id)?),
        CustomersCommand::History { id } => print_json(&service.customer_history(&id)?),
        CustomersCommand::Update(update) => {
            let patch = update.patch();
            if patch.is_empty() {
                return Err("no fields to update".into());
            }
            let result = apply_engine_command(
                EngineCommand::UpdateCustomer {
                    customer_id: update.id,
                    actor: update.actor,
                    patch,
                },
                &service,
            )?;
            print_json(&result)
        }
    }
}
