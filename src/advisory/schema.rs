//! Response contracts sent with each generation request, in the
//! upper-case type vocabulary the generative API expects.

use serde_json::{json, Map, Value};

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn number() -> Value {
    json!({ "type": "NUMBER" })
}

fn boolean() -> Value {
    json!({ "type": "BOOLEAN" })
}

fn string_enum(values: &[&str]) -> Value {
    json!({ "type": "STRING", "enum": values })
}

fn array(items: Value) -> Value {
    json!({ "type": "ARRAY", "items": items })
}

fn object(properties: &[(&str, Value)], required: &[&str]) -> Value {
    let mut props = Map::new();
    for (name, schema) in properties {
        props.insert((*name).to_string(), schema.clone());
    }
    let mut schema = json!({ "type": "OBJECT", "properties": Value::Object(props) });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

pub fn formulation() -> Value {
    let line = object(
        &[
            ("ingredient", string()),
            ("weightKg", number()),
            ("cost", number()),
        ],
        &["ingredient", "weightKg", "cost"],
    );
    object(
        &[
            ("composition", array(line)),
            ("totalCost", number()),
            ("proteinLevel", number()),
            ("energyLevel", string()),
            ("suggestions", array(string())),
        ],
        &[
            "composition",
            "totalCost",
            "proteinLevel",
            "energyLevel",
            "suggestions",
        ],
    )
}

pub fn flock_plan() -> Value {
    let feed_info = object(
        &[
            ("dailyPerBirdGrams", number()),
            ("monthlyTotalKg", number()),
            ("currentFeedType", string()),
        ],
        &["dailyPerBirdGrams", "monthlyTotalKg", "currentFeedType"],
    );
    let next_change = object(
        &[
            ("week", number()),
            ("targetFeedType", string()),
            ("description", string()),
        ],
        &["week", "targetFeedType", "description"],
    );
    let vaccination = object(
        &[
            ("week", number()),
            ("date", string()),
            ("vaccine", string()),
            ("method", string()),
        ],
        &["week", "date", "vaccine", "method"],
    );
    object(
        &[
            ("summary", string()),
            ("estimatedLayingDate", string()),
            ("feedConsumptionInfo", feed_info),
            ("nextFeedChange", next_change),
            ("vaccinationSchedule", array(vaccination)),
            ("biosecurityProtocols", array(string())),
            ("healthAlerts", array(string())),
        ],
        &[
            "summary",
            "estimatedLayingDate",
            "feedConsumptionInfo",
            "nextFeedChange",
            "vaccinationSchedule",
            "biosecurityProtocols",
            "healthAlerts",
        ],
    )
}

pub fn finance() -> Value {
    let tip = object(
        &[("reason", string()), ("solution", string())],
        &["reason", "solution"],
    );
    object(
        &[
            ("productivityPercentage", number()),
            ("costPerEgg", number()),
            ("revenue", number()),
            ("netProfit", number()),
            ("analysis", string()),
            ("improvementTips", array(tip)),
        ],
        &[
            "productivityPercentage",
            "costPerEgg",
            "revenue",
            "netProfit",
            "analysis",
            "improvementTips",
        ],
    )
}

pub fn vet_diagnosis() -> Value {
    object(
        &[
            ("diagnosis", string()),
            ("signsObserved", array(string())),
            ("firstAidSteps", array(string())),
            ("importantNotice", string()),
        ],
        &[
            "diagnosis",
            "signsObserved",
            "firstAidSteps",
            "importantNotice",
        ],
    )
}

pub fn biosecurity() -> Value {
    object(
        &[
            ("cumulativeMortalityRate", number()),
            ("isRedAlert", boolean()),
            ("liveBirdsRemaining", number()),
            ("probableCauses", array(string())),
            ("analysis", string()),
            ("emergencyProcedures", array(string())),
        ],
        &[
            "cumulativeMortalityRate",
            "isRedAlert",
            "liveBirdsRemaining",
            "probableCauses",
            "analysis",
            "emergencyProcedures",
        ],
    )
}

pub fn handling() -> Value {
    let item = object(
        &[
            ("task", string()),
            (
                "category",
                string_enum(&["bedding", "waterers", "lighting", "disinfection"]),
            ),
            ("description", string()),
        ],
        &["task", "category", "description"],
    );
    let shed = object(
        &[("beddingType", string()), ("lightingHours", string())],
        &["beddingType", "lightingHours"],
    );
    object(
        &[
            ("batchName", string()),
            ("checklist", array(item)),
            ("antiStressProtocol", array(string())),
            ("shedSpecs", shed),
            ("expertNote", string()),
        ],
        &[
            "batchName",
            "checklist",
            "antiStressProtocol",
            "shedSpecs",
            "expertNote",
        ],
    )
}

pub fn inventory() -> Value {
    let stats = object(
        &[
            ("layingWeeks", number()),
            ("remainingProductiveWeeks", number()),
            ("replacementUrgency", string()),
        ],
        &[],
    );
    let flock = object(
        &[
            ("name", string()),
            ("quantity", number()),
            ("age", number()),
            ("stats", stats),
        ],
        &["name", "quantity", "age"],
    );
    let category = object(
        &[
            ("category", string()),
            ("totalCount", number()),
            ("flocks", array(flock)),
        ],
        &["category", "totalCount", "flocks"],
    );
    object(
        &[
            ("totalBirds", number()),
            ("categories", array(category)),
            ("managerAnalysis", string()),
        ],
        &["totalBirds", "categories", "managerAnalysis"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_are_listed() {
        let schema = finance();
        assert_eq!(schema["type"], "OBJECT");
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|field| field == "netProfit"));
        assert_eq!(schema["properties"]["improvementTips"]["type"], "ARRAY");
    }

    #[test]
    fn optional_stats_have_no_required_list() {
        let schema = inventory();
        let stats = &schema["properties"]["categories"]["items"]["properties"]["flocks"]["items"]
            ["properties"]["stats"];
        assert!(stats.get("required").is_none());
    }
}
