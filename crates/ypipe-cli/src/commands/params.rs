use serde_json::{json, Map, Value};
use ypipe_core::{BatchQuery, PipelineConfig, RequestSpec, RequestSpecBuilder};

use crate::error::CliError;

/// Resolves the chart requests of `query` in fetch order.
pub fn run(query: &BatchQuery, config: &PipelineConfig) -> Result<Value, CliError> {
    let builder = RequestSpecBuilder::new(config.chart_base_url.clone());
    let params = builder.price_params(query.period, query.interval, query.start, query.end)?;

    let requests: Vec<Value> = builder
        .price_urls(&query.symbols)
        .iter()
        .flat_map(|url| params.iter().map(move |param| RequestSpec::chart(url.as_str(), param)))
        .map(|spec| {
            let params: Map<String, Value> = spec
                .params
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            json!({ "url": spec.url, "params": params })
        })
        .collect();

    Ok(Value::Array(requests))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_one_request_per_symbol_and_interval() {
        let query = BatchQuery::parse(&["AAPL", "MSFT"], Some("5d"), "1h", None, None)
            .expect("valid query");
        let value = run(&query, &PipelineConfig::default()).expect("params");

        let requests = value.as_array().expect("array");
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0]["url"],
            "https://query2.finance.yahoo.com/v8/finance/chart/AAPL"
        );
        assert_eq!(requests[1]["params"]["range"], "5d");
        assert_eq!(requests[1]["params"]["interval"], "1h");
        assert_eq!(requests[1]["params"]["events"], "div,splits");
    }
}
