use std::time::Duration;

use coop_core::advisory::{
    parse_reply, AdvisoryError, AdvisoryService, BiosecurityReport, ChecklistCategory,
    FinanceAdvice, FormulationResult, GenerativeClient, HandlingChecklist,
};

const FORMULATION: &str = r#"{
  "composition": [
    {"ingredient": "Milho Grão", "weightKg": 62.0, "cost": 74.4},
    {"ingredient": "Farelo de Soja", "weightKg": 25.0, "cost": 70.0}
  ],
  "totalCost": 144.4,
  "proteinLevel": 17.5,
  "energyLevel": "2800 kcal/kg",
  "suggestions": ["Ofereça calcário grosso à tarde"]
}"#;

#[test]
fn formulation_reply_parses_into_typed_result() {
    let result: FormulationResult = parse_reply(FORMULATION).unwrap();
    assert_eq!(result.composition.len(), 2);
    assert_eq!(result.composition[1].ingredient, "Farelo de Soja");
    assert_eq!(result.total_cost, 144.4);
    assert_eq!(result.suggestions.len(), 1);
}

#[test]
fn negative_cost_is_rejected() {
    let reply = FORMULATION.replace("\"cost\": 70.0", "\"cost\": -70.0");
    let err = parse_reply::<FormulationResult>(&reply).unwrap_err();
    assert!(matches!(err, AdvisoryError::Validation(_)), "unexpected: {err:?}");
}

#[test]
fn finance_advice_may_report_a_loss() {
    let reply = r#"{
      "productivityPercentage": 62.5,
      "costPerEgg": 0.55,
      "netProfit": -12.0,
      "revenue": 60.0,
      "analysis": "Custo de ração acima da receita.",
      "improvementTips": [{"reason": "Ração cara", "solution": "Cotar fornecedores"}]
    }"#;
    let advice: FinanceAdvice = parse_reply(reply).unwrap();
    assert_eq!(advice.net_profit, -12.0);
    assert_eq!(advice.improvement_tips[0].solution, "Cotar fornecedores");
}

#[test]
fn mortality_rate_above_one_hundred_is_rejected() {
    let reply = r#"{
      "cumulativeMortalityRate": 140,
      "isRedAlert": true,
      "liveBirdsRemaining": 10,
      "probableCauses": [],
      "analysis": "x",
      "emergencyProcedures": []
    }"#;
    let err = parse_reply::<BiosecurityReport>(reply).unwrap_err();
    assert!(matches!(err, AdvisoryError::Validation(_)));
}

#[test]
fn checklist_categories_are_enumerated() {
    let valid = r#"{
      "batchName": "Lote A",
      "checklist": [{"task": "Trocar cama", "category": "bedding", "description": "Maravalha nova"}],
      "antiStressProtocol": ["Vitamina C na água"],
      "shedSpecs": {"beddingType": "Maravalha", "lightingHours": "16h"},
      "expertNote": "Transfira à noite."
    }"#;
    let checklist: HandlingChecklist = parse_reply(valid).unwrap();
    assert_eq!(checklist.checklist[0].category, ChecklistCategory::Bedding);

    let unknown = valid.replace("\"bedding\"", "\"heating\"");
    let err = parse_reply::<HandlingChecklist>(&unknown).unwrap_err();
    assert!(matches!(err, AdvisoryError::Parse(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let client = GenerativeClient::new(
        "0123456789abcdef",
        Some("http://127.0.0.1:9"),
        None,
        Some(Duration::from_secs(5)),
    )
    .unwrap();
    let err = client.egg_ad("caipira").await.unwrap_err();
    assert!(
        matches!(err, AdvisoryError::Transport(_) | AdvisoryError::Timeout),
        "unexpected: {err:?}"
    );
}
