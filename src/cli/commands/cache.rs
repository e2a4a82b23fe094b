use super::print_json;
use crate::services::CacheAction;
use crate::state::SharedState;

pub async fn cmd_cache(state: &SharedState, action: &str) -> anyhow::Result<()> {
    let action: CacheAction = action.parse()?;
    let outcome = state.cache_admin.run(action).await?;
    print_json(&outcome)
}
