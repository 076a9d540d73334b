use anyhow::Result;

pub const REGISTER_URL: &str = "http://truecraft.io/register";

pub async fn handle_register() -> Result<()> {
    o_step!("Create an account at:");
    o_result!("{}", REGISTER_URL);
    o_detail!("Then run `truecraft login`.");
    Ok(())
}
