use crate::errors::{ErrorKind, Result};
use crate::models::{Price, PriceChange};
use crate::state::Session;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Reads commands line by line until `exit` or end of input.
///
/// Bad selectors and unparsable prices are reported and the loop re-prompts.
/// Lookup and notification failures end the loop with the error.
pub async fn run_prompt<R>(reader: R, session: &Session) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let console = &session.console;
    let mut lines = reader.lines();
    loop {
        console.line("")?;
        console.line(format!(
            "Enter product name ({}) to change price or type 'exit' to quit:",
            session.selector_hint()
        ))?;
        let Some(input) = lines.next_line().await? else {
            tracing::debug!("input closed");
            break;
        };
        if input.trim().eq_ignore_ascii_case("exit") {
            break;
        }
        let name = match session.resolve(&input) {
            Ok(name) => name,
            Err(ErrorKind::InvalidSelector(input)) => {
                tracing::debug!(input = %input, "invalid product selector");
                console.line("Invalid product name.")?;
                continue;
            }
            Err(err) => return Err(err),
        };
        console.line("Enter new price:")?;
        let Some(input) = lines.next_line().await? else {
            tracing::debug!("input closed");
            break;
        };
        let price = match Price::parse(&input) {
            Ok(price) => price,
            Err(err) => {
                tracing::debug!(reason = %err, "invalid price input");
                console.line("Invalid price input.")?;
                continue;
            }
        };
        let product = session.registry.get_by_name(name)?;
        if let PriceChange::Changed { old, new, notified } = product.change_price(price).await? {
            tracing::info!(product = name, %old, %new, notified, "price changed");
        }
    }
    Ok(())
}
