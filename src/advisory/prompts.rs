//! Prompt text for each advisory kind. The service answers producers in
//! Portuguese, so the prompts are written in Portuguese.

use super::types::*;

pub fn formulation(request: &FormulationRequest) -> String {
    let prices = request
        .ingredients
        .iter()
        .map(|ingredient| format!("{}: R$ {:.2}/kg", ingredient.name, ingredient.price_per_kg))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Você é especialista em nutrição animal. \
         Monte uma fórmula de 100 kg de ração para a fase {phase}. \
         Ingredientes disponíveis e preços: {prices}. \
         Atinja os níveis ideais de proteína e energia da fase com o menor custo possível \
         e, se algum ingrediente estiver caro demais, sugira substitutos mais baratos.",
        phase = request.phase.label(),
    )
}

pub fn flock_plan(request: &FlockPlanRequest) -> String {
    format!(
        "Você é especialista em nutrição e manejo avícola. \
         Lote da linhagem {lineage} com {quantity} aves, idade atual de {age} semanas, \
         chegada em {arrival}. \
         Entregue um plano de manejo nutricional e sanitário em JSON.",
        lineage = request.lineage,
        quantity = request.quantity,
        age = request.age_in_weeks,
        arrival = request.arrival_date,
    )
}

pub fn finance(request: &FinanceRequest) -> String {
    format!(
        "Você é consultor financeiro do agronegócio avícola. \
         Dados diários da granja: plantel de {birds} aves, produção de {eggs} ovos, \
         custo operacional de R$ {cost:.2} e preço de venda de R$ {price:.2} por dúzia. \
         Analise o lucro e traga dicas de melhoria em JSON.",
        birds = request.bird_count,
        eggs = request.egg_count,
        cost = request.daily_cost,
        price = request.price_per_dozen,
    )
}

pub fn vet(request: &VetRequest) -> String {
    format!(
        "Você é veterinário especializado em aves. Examine as imagens anexadas. \
         Idade da ave: {age}. Linhagem: {lineage}. Sintomas relatados: \"{description}\". \
         Aponte sinais visíveis de doença, deficiência nutricional ou parasitas, \
         um diagnóstico provável, os sinais observados nas imagens e os primeiros socorros, \
         incluindo isolamento quando necessário. \
         Deixe claro que é uma triagem preliminar por IA e que a consulta presencial \
         com um veterinário é indispensável antes de qualquer medicação.",
        age = request.age,
        lineage = request.lineage,
        description = request.description,
    )
}

pub fn biosecurity(request: &BiosecurityRequest) -> String {
    format!(
        "Você é analista de biosseguridade. Lote \"{name}\": {initial} aves no início, \
         {today} mortes hoje, {previous} mortes anteriores, idade {age}. \
         Calcule a mortalidade acumulada (mortes totais / inicial * 100). \
         Se as mortes de hoje passarem de 2% do lote inicial, declare ALERTA VERMELHO, \
         liste as 3 causas mais prováveis de morte súbita nessa idade e os procedimentos \
         sanitários de emergência. Caso contrário, informe as aves vivas restantes \
         com uma análise tranquilizadora.",
        name = request.batch_name,
        initial = request.initial_count,
        today = request.lost_today,
        previous = request.previous_losses,
        age = request.bird_age,
    )
}

pub fn handling(request: &HandlingRequest) -> String {
    format!(
        "Você é consultor sênior de manejo avícola. O lote \"{name}\" ({count} aves) \
         será transferido de \"{origin}\" para \"{destination}\". \
         Gere o checklist do que preparar no destino, classificando cada item como \
         bedding, waterers, lighting ou disinfection; um protocolo antiestresse para o dia \
         da mudança; e o tipo de cama e as horas de luz ideais para o destino.",
        name = request.batch_name,
        count = request.bird_count,
        origin = request.origin,
        destination = request.destination,
    )
}

pub fn inventory(lines: &[InventoryLine]) -> String {
    let flocks = lines
        .iter()
        .map(|line| {
            format!(
                "- Lote: {}, Qtd: {}, Idade: {} semanas, Linhagem: {}",
                line.name, line.quantity, line.age_in_weeks, line.lineage
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Você gerencia o inventário de uma granja. Organize o censo dos lotes ativos:\n\
         {flocks}\n\
         Categorias: Cria (até 5 semanas), Recria (6 a 18 semanas), \
         Produção (19 a 75 semanas) e Descarte (acima de 75 semanas). \
         Para aves em produção, informe há quantas semanas estão botando (idade - 18), \
         a vida produtiva restante e a urgência de reposição (low, medium, high)."
    )
}

pub fn egg_ad(egg_type: &str) -> String {
    format!(
        "Você é redator publicitário de produtos da roça. \
         Escreva um anúncio curto para status do WhatsApp e grupos de vizinhos vendendo \
         ovos do tipo {egg_type}: frescos, colhidos hoje, de criação ética. \
         Use apelos de saúde, sabor de infância e estoque limitado, com emojis rurais. \
         Responda só com o texto pronto para copiar."
    )
}
